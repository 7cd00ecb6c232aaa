use super::{CandidateLine, Score};

/// Parse an `info` line into a candidate line.
///
/// Returns `None` for non-info lines, `info string` lines and lines that carry
/// neither a score nor a pv (currmove / hashfull progress reports). Lines
/// without `multipv` count as index 1.
pub fn parse_info_line(line: &str) -> Option<CandidateLine> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.first().copied() != Some("info") {
        return None;
    }

    let mut rank = 1u32;
    let mut score = None;
    let mut pv = Vec::new();
    let mut i = 1;
    while i < tokens.len() {
        match tokens[i] {
            "string" => return None,
            "multipv" => {
                if i + 1 < tokens.len() {
                    rank = tokens[i + 1].parse::<u32>().unwrap_or(1);
                    i += 1;
                }
            }
            "score" => {
                if i + 2 < tokens.len() {
                    let value = tokens[i + 2].parse::<i32>().ok();
                    match tokens[i + 1] {
                        "cp" => {
                            score = value.map(Score::Cp);
                            i += 2;
                        }
                        "mate" => {
                            score = value.map(Score::Mate);
                            i += 2;
                        }
                        _ => {}
                    }
                }
            }
            "pv" => {
                pv = tokens[i + 1..].iter().map(|s| s.to_string()).collect();
                break;
            }
            _ => {}
        }
        i += 1;
    }

    if score.is_none() && pv.is_empty() {
        return None;
    }
    Some(CandidateLine { rank, score, pv })
}
