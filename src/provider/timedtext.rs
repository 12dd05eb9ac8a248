use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::{ProviderError, RawSegment};

fn text_element_regex() -> &'static Regex {
    static TEXT_ELEMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    TEXT_ELEMENT_REGEX.get_or_init(|| {
        Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)")
            .expect("Failed to compile text element regex")
    })
}

fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE_REGEX: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE_REGEX.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*"([^"]*)""#)
            .expect("Failed to compile attribute regex")
    })
}

fn entity_regex() -> &'static Regex {
    static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();
    ENTITY_REGEX.get_or_init(|| {
        Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").expect("Failed to compile entity regex")
    })
}

fn html_tag_regex() -> &'static Regex {
    static HTML_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    HTML_TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("Failed to compile HTML tag regex"))
}

/// Parse a timed text XML document into caption segments.
///
/// Elements without content are skipped. Caption text is escaped twice by
/// YouTube (XML then HTML), so it is unescaped twice before inline markup is
/// stripped.
pub fn parse_timedtext(xml: &str) -> Result<Vec<RawSegment>, ProviderError> {
    let mut segments = Vec::new();

    for caps in text_element_regex().captures_iter(xml) {
        let content = match caps.get(2) {
            Some(content) if !content.as_str().is_empty() => content.as_str(),
            _ => continue,
        };

        let attributes = &caps[1];
        let start = attribute(attributes, "start")
            .ok_or_else(|| ProviderError::YouTubeDataUnparsable("text element without start".to_string()))
            .and_then(|value| parse_seconds(&value))?;
        let duration = attribute(attributes, "dur")
            .map(|value| parse_seconds(&value))
            .transpose()?;

        let text = unescape(&unescape(content));
        let text = html_tag_regex().replace_all(&text, "").into_owned();

        segments.push(RawSegment { text, start, duration });
    }

    Ok(segments)
}

fn attribute(attributes: &str, name: &str) -> Option<String> {
    attribute_regex()
        .captures_iter(attributes)
        .find(|caps| &caps[1] == name)
        .map(|caps| caps[2].to_string())
}

fn parse_seconds(value: &str) -> Result<f64, ProviderError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ProviderError::YouTubeDataUnparsable(format!("invalid time value: {}", value)))
}

/// Decode named and numeric character references
pub fn unescape(input: &str) -> String {
    entity_regex()
        .replace_all(input, |caps: &Captures| {
            decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// HTML 4 Latin-1 entities, U+00A0 through U+00FF in code point order
const LATIN1_ENTITIES: [&str; 96] = [
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect",
    "uml", "copy", "ordf", "laquo", "not", "shy", "reg", "macr",
    "deg", "plusmn", "sup2", "sup3", "acute", "micro", "para", "middot",
    "cedil", "sup1", "ordm", "raquo", "frac14", "frac12", "frac34", "iquest",
    "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig", "Ccedil",
    "Egrave", "Eacute", "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml",
    "ETH", "Ntilde", "Ograve", "Oacute", "Ocirc", "Otilde", "Ouml", "times",
    "Oslash", "Ugrave", "Uacute", "Ucirc", "Uuml", "Yacute", "THORN", "szlig",
    "agrave", "aacute", "acirc", "atilde", "auml", "aring", "aelig", "ccedil",
    "egrave", "eacute", "ecirc", "euml", "igrave", "iacute", "icirc", "iuml",
    "eth", "ntilde", "ograve", "oacute", "ocirc", "otilde", "ouml", "divide",
    "oslash", "ugrave", "uacute", "ucirc", "uuml", "yacute", "thorn", "yuml",
];

fn named_entity(name: &str) -> Option<char> {
    if let Some(index) = LATIN1_ENTITIES.iter().position(|entity| *entity == name) {
        return char::from_u32(0xA0 + index as u32);
    }

    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "OElig" => '\u{152}',
        "oelig" => '\u{153}',
        "Scaron" => '\u{160}',
        "scaron" => '\u{161}',
        "Yuml" => '\u{178}',
        "fnof" => '\u{192}',
        "circ" => '\u{2c6}',
        "tilde" => '\u{2dc}',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "thinsp" => '\u{2009}',
        "zwnj" => '\u{200c}',
        "zwj" => '\u{200d}',
        "lrm" => '\u{200e}',
        "rlm" => '\u{200f}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "sbquo" => '\u{201a}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "bdquo" => '\u{201e}',
        "dagger" => '\u{2020}',
        "Dagger" => '\u{2021}',
        "bull" => '\u{2022}',
        "hellip" => '\u{2026}',
        "permil" => '\u{2030}',
        "prime" => '\u{2032}',
        "Prime" => '\u{2033}',
        "lsaquo" => '\u{2039}',
        "rsaquo" => '\u{203a}',
        "euro" => '\u{20ac}',
        "trade" => '\u{2122}',
        "larr" => '\u{2190}',
        "uarr" => '\u{2191}',
        "rarr" => '\u{2192}',
        "darr" => '\u{2193}',
        "harr" => '\u{2194}',
        "spades" => '\u{2660}',
        "clubs" => '\u{2663}',
        "hearts" => '\u{2665}',
        "diams" => '\u{2666}',
        _ => return None,
    };
    Some(decoded)
}

fn decode_entity(entity: &str) -> Option<String> {
    if let Some(numeric) = entity.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }

    named_entity(entity).map(String::from)
}
