// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

// Writes the message followed by the rendered cause in brackets.  An absent
// cause renders as the fixed sentinel "<nil>".
impl std::fmt::Display for crate::AnnotatedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            Some(inner) => write!(f, "{}: [{}]", self.message, inner),
            None => write!(f, "{}: [<nil>]", self.message),
        }
    }
}

// Goes through the whole error chain and writes all the errors as JSON.
impl std::fmt::Debug for crate::AnnotatedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;

        // Write the message
        let message_esc = json_escape(&self.message);
        write!(f, "\"message\":{}", message_esc)?;

        // Write the tags if present
        if !self.tags.is_empty() {
            write!(f, ",\"tags\":[")?;

            // Write the first element without the "," in front
            let tag_esc = json_escape(self.tags[0].as_str());
            write!(f, "{}", tag_esc)?;

            // Write other elements with the "," in front
            for tag in self.tags.iter().skip(1) {
                let tag_esc = json_escape(tag.as_str());
                write!(f, ",{}", tag_esc)?;
            }

            write!(f, "]")?;
        }

        // Write the cause of the error
        if let Some(inner) = &self.inner {
            write!(f, ",\"source\":")?;
            debug_source(inner.as_ref(), f)?;
        }

        write!(f, "}}")
    }
}

fn debug_source(
    error: &(dyn std::error::Error + 'static),
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    // An annotated link uses its own structured Debug output
    if let Some(annotated) = error.downcast_ref::<crate::AnnotatedError>() {
        return write!(f, "{:?}", annotated);
    }

    write!(f, "{{")?;

    // Write the error debug
    let error_esc = json_escape(&format!("{:?}", error));
    write!(f, "\"error\":{}", error_esc)?;

    // Write the source of the error
    if let Some(source) = error.source() {
        write!(f, ",\"source\":")?;

        debug_source(source, f)?;
    }

    write!(f, "}}")
}

fn json_escape(value: &str) -> String {
    serde_json::json!(value).to_string()
}

#[cfg(test)]
mod tests {
    use crate::{annotate, display::json_escape, AnnotatedError, Tag};

    macro_rules! plain_error {
        ($name:ident) => {
            #[derive(Debug)]
            struct $name(&'static str);

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl std::error::Error for $name {}
        };
    }

    plain_error!(PlainError);

    #[test]
    fn test_json_escape() {
        assert_eq!(json_escape("Some string"), r#""Some string""#);
        assert_eq!(
            json_escape("String with \"quotes\""),
            r#""String with \"quotes\"""#
        );
        assert_eq!(
            json_escape("{\"key\":\"value\"}"),
            r#""{\"key\":\"value\"}""#
        );
    }

    #[test]
    fn test_display() {
        let err = annotate!(PlainError("testError1"), [], "wrap message {}", 10);
        assert_eq!(err.to_string(), "wrap message 10: [testError1]");
    }

    #[test]
    fn test_display_no_cause() {
        let err = AnnotatedError::root(vec![Tag::from("fatal")], "out of disk");
        assert_eq!(err.to_string(), "out of disk: [<nil>]");
    }

    #[test]
    fn test_display_nested() {
        let inner = annotate!(PlainError("testError1"), ["abc"], "custom");
        let outer = annotate!(inner, ["efg"], "custom2");
        assert_eq!(outer.to_string(), "custom2: [custom: [testError1]]");
    }

    #[test]
    fn test_debug() {
        let inner = annotate!(PlainError("testError1"), ["abc"], "custom");
        let outer = annotate!(inner, [], "custom2");
        assert_eq!(
            format!("{outer:?}"),
            r#"{"message":"custom2","source":{"message":"custom","tags":["abc"],"source":{"error":"PlainError(\"testError1\")"}}}"#
        );
    }

    #[test]
    fn test_debug_quotes() {
        // quotes in the message must stay escaped
        let err = AnnotatedError::root(vec![Tag::from("io")], "read \"config\"");
        assert_eq!(
            format!("{err:?}"),
            r#"{"message":"read \"config\"","tags":["io"]}"#
        );
    }
}
