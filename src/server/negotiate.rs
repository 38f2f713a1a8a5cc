//! Content negotiation against an `Accept` header.

use mime::Mime;

/// A parsed media range with its quality.
struct MediaRange {
    mime: Mime,
    quality: f32,
}

fn parse_accept(header: &str) -> Vec<MediaRange> {
    header
        .split(',')
        .filter_map(|part| {
            let mime: Mime = part.trim().parse().ok()?;
            let quality = mime
                .get_param("q")
                .and_then(|q| q.as_str().parse::<f32>().ok())
                .unwrap_or(1.0);
            Some(MediaRange { mime, quality })
        })
        .collect()
}

/// How specifically a range matches an offer: 0 = no match, 1 = `*/*`,
/// 2 = `type/*`, 3 = exact.
fn fitness(range: &Mime, offer: &Mime) -> u8 {
    let type_matches = range.type_() == mime::STAR || range.type_() == offer.type_();
    if !type_matches {
        return 0;
    }
    if range.subtype() == mime::STAR {
        if range.type_() == mime::STAR { 1 } else { 2 }
    } else if range.subtype() == offer.subtype() {
        3
    } else {
        0
    }
}

/// Pick the best offer for an `Accept` header.
///
/// Returns `None` when no offer is acceptable. A missing or unparsable
/// header yields the first offer (the client accepts anything).
pub fn negotiate(accept: Option<&str>, offers: &[String]) -> Option<String> {
    let Some(header) = accept else {
        return offers.first().cloned();
    };

    let ranges = parse_accept(header);
    if ranges.is_empty() {
        return offers.first().cloned();
    }

    let mut best: Option<(f32, u8, &String)> = None;
    for offer in offers {
        let Ok(offer_mime) = offer.parse::<Mime>() else {
            continue;
        };

        // the most specific matching range decides this offer's quality
        let mut offer_match: Option<(u8, f32)> = None;
        for range in &ranges {
            let fit = fitness(&range.mime, &offer_mime);
            if fit == 0 {
                continue;
            }
            if offer_match.is_none_or(|(best_fit, _)| fit > best_fit) {
                offer_match = Some((fit, range.quality));
            }
        }

        let Some((fit, quality)) = offer_match else {
            continue;
        };
        if quality <= 0.0 {
            continue;
        }

        let better = match &best {
            None => true,
            Some((best_quality, best_fit, _)) => {
                quality > *best_quality || (quality == *best_quality && fit > *best_fit)
            }
        };
        if better {
            best = Some((quality, fit, offer));
        }
    }

    best.map(|(_, _, offer)| offer.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offers(types: &[&str]) -> Vec<String> {
        types.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn exact_match_wins() {
        let offered = offers(&["text/html", "text/turtle"]);
        assert_eq!(
            negotiate(Some("text/turtle"), &offered),
            Some("text/turtle".to_string())
        );
    }

    #[test]
    fn single_offered_type_is_served_when_accepted() {
        let offered = offers(&["application/ld+json"]);
        assert_eq!(
            negotiate(Some("application/ld+json"), &offered),
            Some("application/ld+json".to_string())
        );
    }

    #[test]
    fn quality_ranks_ranges() {
        let offered = offers(&["text/html", "text/turtle"]);
        assert_eq!(
            negotiate(Some("text/turtle,*/*;q=0.1"), &offered),
            Some("text/turtle".to_string())
        );
        assert_eq!(
            negotiate(Some("text/html;q=0.2,text/turtle;q=0.9"), &offered),
            Some("text/turtle".to_string())
        );
    }

    #[test]
    fn wildcard_accepts_first_offer() {
        let offered = offers(&["application/rdf+xml", "text/turtle"]);
        assert_eq!(
            negotiate(Some("*/*"), &offered),
            Some("application/rdf+xml".to_string())
        );
    }

    #[test]
    fn type_wildcard_matches_within_type() {
        let offered = offers(&["application/ld+json", "text/turtle"]);
        assert_eq!(
            negotiate(Some("text/*"), &offered),
            Some("text/turtle".to_string())
        );
    }

    #[test]
    fn missing_header_takes_first_offer() {
        let offered = offers(&["text/plain", "text/html"]);
        assert_eq!(negotiate(None, &offered), Some("text/plain".to_string()));
    }

    #[test]
    fn garbage_header_takes_first_offer() {
        let offered = offers(&["text/plain"]);
        assert_eq!(
            negotiate(Some(";;;not-a-type;;;"), &offered),
            Some("text/plain".to_string())
        );
    }

    #[test]
    fn unacceptable_offers_yield_none() {
        let offered = offers(&["text/turtle"]);
        assert_eq!(negotiate(Some("application/pdf"), &offered), None);
    }

    #[test]
    fn zero_quality_excludes_a_type() {
        let offered = offers(&["text/html"]);
        assert_eq!(negotiate(Some("text/html;q=0"), &offered), None);
    }
}
