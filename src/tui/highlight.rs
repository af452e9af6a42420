//! Highlighting of accepted tokens inside the query text.
//!
//! Produces a list of segments borrowed from the text, each either plain or
//! highlighted. Tokens are matched longest first, and a match never starts
//! inside a region that is already highlighted, so `zona` cannot split an
//! earlier `zona.nombre` match.

/// A run of text, highlighted or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

impl<'a> Segment<'a> {
    fn plain(text: &'a str) -> Self {
        Self {
            text,
            highlighted: false,
        }
    }

    fn marked(text: &'a str) -> Self {
        Self {
            text,
            highlighted: true,
        }
    }
}

/// Splits `text` into plain and highlighted segments.
///
/// Every case-insensitive occurrence of every token is highlighted, keeping
/// the casing found in `text`. With no tokens the whole text is a single
/// plain segment; an empty text yields no segments.
pub fn highlight<'a>(text: &'a str, tokens: &[String]) -> Vec<Segment<'a>> {
    let mut segments = if text.is_empty() {
        Vec::new()
    } else {
        vec![Segment::plain(text)]
    };

    for token in longest_first(tokens) {
        let mut next = Vec::with_capacity(segments.len());
        for segment in segments {
            if segment.highlighted {
                next.push(segment);
            } else {
                split_matches(segment.text, token, &mut next);
            }
        }
        segments = next;
    }

    segments
}

/// Renders segments as a string, wrapping highlighted runs in `open`/`close`.
pub fn to_markup(segments: &[Segment<'_>], open: &str, close: &str) -> String {
    let mut out = String::new();
    for segment in segments {
        if segment.highlighted {
            out.push_str(open);
            out.push_str(segment.text);
            out.push_str(close);
        } else {
            out.push_str(segment.text);
        }
    }
    out
}

/// Non-empty tokens sorted by descending length, ties broken lexically.
fn longest_first(tokens: &[String]) -> Vec<&str> {
    let mut sorted: Vec<&str> = tokens
        .iter()
        .map(String::as_str)
        .filter(|t| !t.is_empty())
        .collect();
    sorted.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    sorted.dedup();
    sorted
}

/// Pushes the pieces of a plain `text` onto `out`, marking matches of `token`.
fn split_matches<'a>(text: &'a str, token: &str, out: &mut Vec<Segment<'a>>) {
    let mut rest = text;
    while let Some((start, end)) = find_ignore_case(rest, token) {
        if start > 0 {
            out.push(Segment::plain(&rest[..start]));
        }
        out.push(Segment::marked(&rest[start..end]));
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        out.push(Segment::plain(rest));
    }
}

/// Finds the first case-insensitive occurrence of `needle`, as a byte range.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    haystack.char_indices().find_map(|(start, _)| {
        match_len_ignore_case(&haystack[start..], needle).map(|len| (start, start + len))
    })
}

/// If `haystack` starts with `needle` (ignoring case), returns the byte length
/// of the matched prefix of `haystack`.
fn match_len_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let mut hay = haystack.char_indices();
    for n in needle.chars() {
        let (_, h) = hay.next()?;
        if h != n && !h.to_lowercase().eq(n.to_lowercase()) {
            return None;
        }
    }
    Some(hay.next().map_or(haystack.len(), |(i, _)| i))
}
