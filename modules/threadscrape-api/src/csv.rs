//! CSV rendering of search results for download.

use std::fmt::Write;

use threads_client::Record;

pub const HEADER: [&str; 4] = ["username", "caption", "postId", "userId"];

fn needs_quotes(field: &str) -> bool {
    field.contains(',')
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r')
        || field.starts_with(char::is_whitespace)
        || field.ends_with(char::is_whitespace)
}

fn write_row<'a>(out: &mut String, row: impl IntoIterator<Item = &'a str>) {
    let mut first = true;
    for cell in row {
        if !first {
            out.push(',');
        }
        first = false;
        if needs_quotes(cell) {
            let _ = write!(out, "\"{}\"", cell.replace('"', "\"\""));
        } else {
            out.push_str(cell);
        }
    }
    out.push_str("\r\n");
}

/// Header row plus one row per record. Absent values are empty cells.
pub fn write_records(records: &[Record]) -> String {
    let mut out = String::new();
    write_row(&mut out, HEADER);
    for r in records {
        write_row(
            &mut out,
            [
                r.username.as_deref().unwrap_or(""),
                r.caption.as_deref().unwrap_or(""),
                r.post_id.as_deref().unwrap_or(""),
                r.user_id.as_deref().unwrap_or(""),
            ],
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_plain_rows() {
        let records = vec![Record {
            username: Some("alice".to_string()),
            caption: Some("hello world".to_string()),
            post_id: Some("1".to_string()),
            user_id: Some("9".to_string()),
        }];
        assert_eq!(
            write_records(&records),
            "username,caption,postId,userId\r\nalice,hello world,1,9\r\n"
        );
    }

    #[test]
    fn absent_values_are_empty_cells() {
        let records = vec![Record {
            post_id: Some("5".to_string()),
            ..Record::default()
        }];
        assert_eq!(
            write_records(&records),
            "username,caption,postId,userId\r\n,,5,\r\n"
        );
    }

    #[test]
    fn awkward_captions_are_quoted() {
        let records = vec![Record {
            username: Some("bob".to_string()),
            caption: Some("she said \"hi\", then\nleft".to_string()),
            post_id: Some(" 7".to_string()),
            user_id: None,
        }];
        assert_eq!(
            write_records(&records),
            "username,caption,postId,userId\r\nbob,\"she said \"\"hi\"\", then\nleft\",\" 7\",\r\n"
        );
    }

    #[test]
    fn no_records_is_header_only() {
        assert_eq!(write_records(&[]), "username,caption,postId,userId\r\n");
    }
}
