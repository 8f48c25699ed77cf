//! HTML table extraction.
//!
//! Tolerant scanning, not a DOM parser: tags are matched case-insensitively,
//! unclosed `<tr>`/`<td>` end at the next sibling, and nested tables are
//! listed separately and cut out of their parent. Cells spanning rows or
//! columns are copied into every slot they cover.

use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
static SUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<sup\b.*?</sup\s*>").expect("valid sup regex"));
static BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid break regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static FOOTNOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]{0,12}\]").expect("valid footnote regex"));
static ROWSPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\browspan\s*=\s*["']?\s*(\d+)"#).expect("valid rowspan regex"));
static COLSPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\bcolspan\s*=\s*["']?\s*(\d+)"#).expect("valid colspan regex"));

/// Spans beyond this are treated as malformed.
const MAX_SPAN: usize = 1000;

/// A table as a header plus rectangular rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Every table of the document, in the order their opening tags appear.
pub fn extract_tables(html: &str) -> Vec<HtmlTable> {
    let html = COMMENT.replace_all(html, "");
    let lower = html.to_ascii_lowercase();

    let spans = table_spans(&lower);
    spans
        .iter()
        .map(|span| {
            let children = direct_children(&spans, span);
            let (text, lower_text) = inner_without_children(&html, &lower, span, &children);
            build_table(parse_rows(&text, &lower_text))
        })
        .collect()
}

// =============================================================================
// Table boundaries
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    start: usize,
    /// After the opening tag's `>`
    content: usize,
    /// At the closing tag's `<`
    content_end: usize,
    /// After the closing tag's `>`
    end: usize,
}

fn table_spans(lower: &str) -> Vec<Span> {
    let opens = open_tags(lower, "table", 0, lower.len());
    let closes = close_tags(lower, "table");

    let mut events: Vec<(usize, Option<usize>)> = opens.iter().enumerate().map(|(i, (start, _))| (*start, Some(i))).collect();
    events.extend(closes.iter().map(|(start, _)| (*start, None)));
    events.sort_by_key(|(pos, _)| *pos);

    let mut spans: Vec<Span> = opens
        .iter()
        .map(|&(start, content)| Span { start, content, content_end: lower.len(), end: lower.len() })
        .collect();

    let mut stack: Vec<usize> = Vec::new();
    for (pos, event) in events {
        match event {
            Some(i) => stack.push(i),
            None => {
                if let Some(i) = stack.pop() {
                    spans[i].content_end = pos;
                    spans[i].end = lower[pos..].find('>').map(|p| pos + p + 1).unwrap_or(lower.len());
                }
            }
        }
    }
    spans
}

fn direct_children(spans: &[Span], outer: &Span) -> Vec<Span> {
    // spans are in document order, so the first of each nest is outermost
    let mut direct: Vec<Span> = Vec::new();
    for &child in spans.iter().filter(|s| s.start > outer.start && s.start < outer.content_end) {
        if direct.last().map_or(true, |last| child.start >= last.end) {
            direct.push(child);
        }
    }
    direct
}

fn inner_without_children(html: &str, lower: &str, span: &Span, children: &[Span]) -> (String, String) {
    let mut text = String::new();
    let mut lower_text = String::new();
    let mut cursor = span.content;
    for child in children {
        text.push_str(&html[cursor..child.start]);
        lower_text.push_str(&lower[cursor..child.start]);
        cursor = child.end.min(span.content_end);
    }
    if cursor < span.content_end {
        text.push_str(&html[cursor..span.content_end]);
        lower_text.push_str(&lower[cursor..span.content_end]);
    }
    (text, lower_text)
}

/// `(tag start, position after '>')` for each `<name` opening tag in range.
fn open_tags(lower: &str, name: &str, from: usize, to: usize) -> Vec<(usize, usize)> {
    let pattern = format!("<{name}");
    let mut tags = Vec::new();
    let mut cursor = from;

    while let Some(offset) = lower[cursor..to].find(&pattern) {
        let start = cursor + offset;
        let after = start + pattern.len();
        cursor = after;
        let boundary = lower[after..].chars().next().map_or(true, |c| c.is_whitespace() || c == '>' || c == '/');
        if !boundary {
            continue;
        }
        let end = lower[after..].find('>').map_or(lower.len(), |p| after + p + 1);
        tags.push((start, end));
    }
    tags
}

fn close_tags(lower: &str, name: &str) -> Vec<(usize, usize)> {
    let pattern = format!("</{name}");
    lower
        .match_indices(&pattern)
        .map(|(start, _)| (start, start + pattern.len()))
        .filter(|&(_, after)| lower[after..].chars().next().map_or(true, |c| c.is_whitespace() || c == '>'))
        .collect()
}

// =============================================================================
// Rows and cells
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct RawCell {
    header: bool,
    text: String,
    rowspan: usize,
    colspan: usize,
}

fn parse_rows(text: &str, lower: &str) -> Vec<Vec<RawCell>> {
    let rows = open_tags(lower, "tr", 0, lower.len());

    rows.iter()
        .enumerate()
        .map(|(i, &(_, content))| {
            let next = rows.get(i + 1).map_or(lower.len(), |(start, _)| *start);
            let content = content.min(next);
            let end = lower[content..next].find("</tr").map_or(next, |p| content + p);
            parse_cells(text, lower, content, end)
        })
        .filter(|cells| !cells.is_empty())
        .collect()
}

fn parse_cells(text: &str, lower: &str, from: usize, to: usize) -> Vec<RawCell> {
    let mut tags: Vec<(usize, usize, bool)> = open_tags(lower, "td", from, to)
        .into_iter()
        .map(|(s, e)| (s, e, false))
        .chain(open_tags(lower, "th", from, to).into_iter().map(|(s, e)| (s, e, true)))
        .collect();
    tags.sort_by_key(|(start, _, _)| *start);

    tags.iter()
        .enumerate()
        .map(|(i, &(start, content, header))| {
            let next = tags.get(i + 1).map_or(to, |(s, _, _)| *s);
            let content = content.min(next);
            let close = if header { "</th" } else { "</td" };
            let end = lower[content..next].find(close).map_or(next, |p| content + p);
            let open = &text[start..content];

            RawCell {
                header,
                text: cell_text(&text[content..end]),
                rowspan: span_attr(&ROWSPAN, open),
                colspan: span_attr(&COLSPAN, open),
            }
        })
        .collect()
}

fn span_attr(pattern: &Regex, tag: &str) -> usize {
    pattern
        .captures(tag)
        .and_then(|c| c[1].parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_SPAN)
}

/// Visible text of a cell, without footnote references.
pub fn cell_text(fragment: &str) -> String {
    let text = SUP.replace_all(fragment, "");
    let text = BREAK.replace_all(&text, " ");
    let text = TAG.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = FOOTNOTE.replace_all(&text, "");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the named entities tables use plus numeric references.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| entity(&rest[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "ndash" => Some('–'),
        "mdash" => Some('—'),
        "minus" => Some('−'),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value).map(|c| if c == '\u{a0}' { ' ' } else { c })
        }
    }
}

// =============================================================================
// Grid
// =============================================================================

/// Cell still covering rows below: (rows left, header, text)
type Carry = Option<(usize, bool, String)>;

fn expand(rows: Vec<Vec<RawCell>>) -> Vec<Vec<(bool, String)>> {
    let mut carry: Vec<Carry> = Vec::new();
    let mut grid = Vec::with_capacity(rows.len());

    for row in rows {
        let mut out = Vec::new();
        let mut cells = row.into_iter();
        let mut col = 0;

        loop {
            if take_carried(&mut carry, col, &mut out) {
                col += 1;
                continue;
            }

            let Some(cell) = cells.next() else {
                if carry.iter().skip(col).any(Option::is_some) {
                    out.push((false, String::new()));
                    col += 1;
                    continue;
                }
                break;
            };

            for _ in 0..cell.colspan {
                while take_carried(&mut carry, col, &mut out) {
                    col += 1;
                }
                if cell.rowspan > 1 {
                    if carry.len() <= col {
                        carry.resize(col + 1, None);
                    }
                    carry[col] = Some((cell.rowspan - 1, cell.header, cell.text.clone()));
                }
                out.push((cell.header, cell.text.clone()));
                col += 1;
            }
        }
        grid.push(out);
    }
    grid
}

/// Push the cell a rowspan carries into `col`, if any.
fn take_carried(carry: &mut [Carry], col: usize, out: &mut Vec<(bool, String)>) -> bool {
    let Some((left, header, text)) = carry.get_mut(col).and_then(Option::take) else {
        return false;
    };
    if left > 1 {
        carry[col] = Some((left - 1, header, text.clone()));
    }
    out.push((header, text));
    true
}

fn build_table(rows: Vec<Vec<RawCell>>) -> HtmlTable {
    let grid = expand(rows);
    let header_rows = grid.iter().take_while(|row| row.iter().all(|(header, _)| *header)).count();
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);

    let mut headers: Vec<String> = vec![String::new(); width];
    for row in &grid[..header_rows] {
        for (col, (_, text)) in row.iter().enumerate() {
            let current = &mut headers[col];
            if text.is_empty() || *current == *text || current.ends_with(&format!(" {text}")) {
                continue;
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(text);
        }
    }
    if header_rows == 0 {
        headers.clear();
    }

    let rows = grid[header_rows..]
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(|(_, text)| text.clone()).collect();
            cells.resize(width, String::new());
            cells
        })
        .collect();

    HtmlTable { headers, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_table() {
        let html = r#"<TABLE class="wikitable"><TR><TH>Country</TH><TH>2023</TH></TR>
            <tr><td>Norway</td><td>9.81</td></tr>
            <tr><td>Sweden<td>9.39</tr></table>"#;

        let tables = extract_tables(html);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["Country", "2023"]);
        assert_eq!(tables[0].rows, vec![vec!["Norway", "9.81"], vec!["Sweden", "9.39"]]);
    }

    #[test]
    fn test_rowspan_and_colspan() {
        let html = r#"<table>
            <tr><th>Region</th><th>Country</th><th colspan="2">Scores</th></tr>
            <tr><td rowspan="2">North America</td><td>Canada</td><td>8.69</td><td>8.88</td></tr>
            <tr><td>United States</td><td>7.85</td><td>7.85</td></tr>
        </table>"#;

        let table = &extract_tables(html)[0];
        assert_eq!(table.headers, vec!["Region", "Country", "Scores", "Scores"]);
        assert_eq!(table.rows[1], vec!["North America", "United States", "7.85", "7.85"]);
    }

    #[test]
    fn test_colspan_skips_rowspan_column() {
        let html = r#"<table>
            <tr><th>A</th><th>B</th><th>C</th></tr>
            <tr><td>a</td><td rowspan="2">b</td><td>c</td></tr>
            <tr><td colspan="2">x</td></tr>
        </table>"#;

        let table = &extract_tables(html)[0];
        assert_eq!(table.rows[0], vec!["a", "b", "c"]);
        assert_eq!(table.rows[1], vec!["x", "b", "x"]);
    }

    #[test]
    fn test_row_header_cells_stay_data() {
        let html = r#"<table><tr><th>Country</th><th>2023</th></tr>
            <tr><th scope="row">Norway</th><td>9.81</td></tr></table>"#;

        let table = &extract_tables(html)[0];
        assert_eq!(table.rows, vec![vec!["Norway", "9.81"]]);
    }

    #[test]
    fn test_multi_row_header_joined() {
        let html = r#"<table>
            <tr><th rowspan="2">Country</th><th colspan="2">2023</th></tr>
            <tr><th>Rank</th><th>Score</th></tr>
            <tr><td>Norway</td><td>1</td><td>9.81</td></tr>
        </table>"#;

        let table = &extract_tables(html)[0];
        assert_eq!(table.headers, vec!["Country", "2023 Rank", "2023 Score"]);
    }

    #[test]
    fn test_nested_tables_listed_separately() {
        let html = r#"<table><tr><th>Outer</th></tr>
            <tr><td><table><tr><th>Inner</th></tr><tr><td>x</td></tr></table></td></tr>
            </table><table><tr><th>Last</th></tr></table>"#;

        let tables = extract_tables(html);
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[0].headers, vec!["Outer"]);
        assert_eq!(tables[0].rows, vec![vec![""]]);
        assert_eq!(tables[1].headers, vec!["Inner"]);
        assert_eq!(tables[2].headers, vec!["Last"]);
    }

    #[test]
    fn test_similar_tag_names_ignored() {
        let html = r#"<tableau></tableau><table><tr><th>A</th></tr></table>"#;
        assert_eq!(extract_tables(html).len(), 1);
    }

    #[test]
    fn test_cell_text_cleanup() {
        assert_eq!(
            cell_text(r##"<a href="/wiki/Norway">Norway</a><sup class="reference"><a href="#c">[c]</a></sup>"##),
            "Norway"
        );
        assert_eq!(cell_text("Bosnia &amp; Herzegovina[a]"), "Bosnia & Herzegovina");
        assert_eq!(cell_text("Regime<br/>type"), "Regime type");
        assert_eq!(cell_text("  9.81&nbsp; "), "9.81");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("C&#244;te d&#x27;Ivoire"), "Côte d'Ivoire");
        assert_eq!(decode_entities("&lt;b&gt; &quot;x&quot;"), "<b> \"x\"");
        assert_eq!(decode_entities("AT&T &unknown;"), "AT&T &unknown;");
    }

    #[test]
    fn test_comments_ignored() {
        let html = "<!-- <table><tr><th>Hidden</th></tr></table> --><table><tr><th>Shown</th></tr></table>";
        let tables = extract_tables(html);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["Shown"]);
    }
}
