//! A minimal RFC-4180-ish CSV reader/writer: comma field separator,
//! `"`-quoted fields, doubled `""` for an embedded quote, `\n`/`\r\n` record
//! separators.
//!
//! This is the external collaborator the core expression engine is
//! specified against, not a competing spec of its own — it exists so the
//! workspace is runnable end to end.

/// One parsed CSV field: its dequoted text, and whether the field was
/// wrapped in `"..."` in the source text. `quoted` survives dequoting so
/// `CsvField::as_number` can refuse to treat a quoted field as numeric even
/// when its dequoted content happens to parse as one (spec.md §6: a field
/// "is a number only if ... [it] does not begin with `"`" — i.e. was never
/// quoted in the first place).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    pub text: String,
    pub quoted: bool,
}

fn take_field(field: &mut String, quoted: &mut bool) -> RawField {
    RawField { text: std::mem::take(field), quoted: std::mem::take(quoted) }
}

/// Splits `input` into records of dequoted fields, each remembering whether
/// it was quoted in the source text.
pub fn parse_records(input: &str) -> Vec<Vec<RawField>> {
    let mut records = Vec::new();
    let mut chars = input.chars().peekable();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut field_quoted = false;
    let mut in_quotes = false;
    let mut saw_any_char_in_record = false;

    while let Some(c) = chars.next() {
        saw_any_char_in_record = true;
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        field.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                other => field.push(other),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                field_quoted = true;
            }
            ',' => record.push(take_field(&mut field, &mut field_quoted)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(take_field(&mut field, &mut field_quoted));
                records.push(std::mem::take(&mut record));
                saw_any_char_in_record = false;
            }
            '\n' => {
                record.push(take_field(&mut field, &mut field_quoted));
                records.push(std::mem::take(&mut record));
                saw_any_char_in_record = false;
            }
            other => field.push(other),
        }
    }

    if saw_any_char_in_record || !field.is_empty() || !record.is_empty() {
        record.push(take_field(&mut field, &mut field_quoted));
        records.push(record);
    }

    records
}

fn needs_quoting(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn quote_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Renders one CSV record, quoting fields that need it.
pub fn write_record(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| if needs_quoting(f) { quote_field(f) } else { f.clone() })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> RawField {
        RawField { text: text.to_string(), quoted: false }
    }

    fn quoted(text: &str) -> RawField {
        RawField { text: text.to_string(), quoted: true }
    }

    #[test]
    fn parses_plain_fields() {
        let records = parse_records("a,b,c\n1,2,3\n");
        assert_eq!(records, vec![vec![plain("a"), plain("b"), plain("c")], vec![plain("1"), plain("2"), plain("3")]]);
    }

    #[test]
    fn parses_quoted_field_with_comma_and_escaped_quote() {
        let records = parse_records("\"a,b\",\"say \"\"hi\"\"\"\n");
        assert_eq!(records, vec![vec![quoted("a,b"), quoted("say \"hi\"")]]);
    }

    #[test]
    fn handles_crlf_and_missing_trailing_newline() {
        let records = parse_records("a,b\r\nc,d");
        assert_eq!(records, vec![vec![plain("a"), plain("b")], vec![plain("c"), plain("d")]]);
    }

    #[test]
    fn quoted_numeric_looking_field_is_marked_quoted() {
        let records = parse_records("\"42\"\n");
        assert_eq!(records, vec![vec![quoted("42")]]);
    }

    #[test]
    fn writer_quotes_only_when_needed() {
        assert_eq!(write_record(&["plain".into(), "has,comma".into()]), "plain,\"has,comma\"");
        assert_eq!(write_record(&["has\"quote".into()]), "\"has\"\"quote\"");
    }
}
