//! Line-oriented cache scripts.
//!
//! One command per line. A line whose first non-blank character is `#` is a
//! comment, and every command except `set` may end in a ` # note`. The value
//! of `set` runs to the end of the line, so it can contain `#`. Paths are
//! dotted (`users.alice`), values are JSON and fall back to a plain string.

use anyhow::{anyhow, bail, Context};
use stashe_store::Value;
use stashe_types::{Identifier, Path};

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Use(Identifier),
    Set(Path, serde_json::Value),
    Get(Path),
    Del(Path),
    Has(Path),
    Exists(Path),
    Size,
    Stats,
    Flush,
    Dump,
}

impl Op {
    /// Parse one line. Blank lines and comments yield `None`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let rest = if verb == "set" { rest } else { strip_comment(rest) };

        let op = match verb {
            "use" if rest.is_empty() => bail!("usage: use <id>"),
            "use" => Op::Use(rest.parse().unwrap_or_else(|never| match never {})),
            "set" => {
                let (path, raw) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("usage: set <path> <value>"))?;
                Op::Set(parse_path(path)?, parse_value(raw.trim()))
            }
            "get" => Op::Get(parse_path(rest)?),
            "del" => Op::Del(parse_path(rest)?),
            "has" => Op::Has(parse_path(rest)?),
            "exists" => Op::Exists(parse_path(rest)?),
            "size" => Op::Size,
            "stats" => Op::Stats,
            "flush" => Op::Flush,
            "dump" => Op::Dump,
            other => bail!("unknown command '{other}'"),
        };

        Ok(Some(op))
    }
}

/// Cut a trailing comment: a `#` at the start or after whitespace.
fn strip_comment(rest: &str) -> &str {
    let cut = rest
        .char_indices()
        .find(|&(idx, c)| c == '#' && rest[..idx].chars().next_back().map_or(true, char::is_whitespace))
        .map_or(rest.len(), |(idx, _)| idx);
    rest[..cut].trim_end()
}

fn parse_path(raw: &str) -> anyhow::Result<Path> {
    Path::parse_dotted(raw).with_context(|| format!("bad path '{raw}'"))
}

fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_owned()))
}

/// Convert a parsed script value into a storable one.
pub fn to_value(json: &serde_json::Value) -> Value {
    Value::from(json.clone())
}

/// Parse a whole script, reporting the first bad line by number.
pub fn parse_script(text: &str) -> anyhow::Result<Vec<Op>> {
    let mut ops = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(op) = Op::parse(line).with_context(|| format!("line {}", idx + 1))? {
            ops.push(op);
        }
    }
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stashe_types::path;

    #[test]
    fn parses_every_verb() {
        assert_eq!(Op::parse("use 3").unwrap(), Some(Op::Use(Identifier::from(3))));
        assert_eq!(Op::parse("use users").unwrap(), Some(Op::Use(Identifier::from("users"))));
        assert_eq!(
            Op::parse("set a.b 1").unwrap(),
            Some(Op::Set(path!["a", "b"], json!(1)))
        );
        assert_eq!(Op::parse("get a").unwrap(), Some(Op::Get(path!["a"])));
        assert_eq!(Op::parse("del a.b").unwrap(), Some(Op::Del(path!["a", "b"])));
        assert_eq!(Op::parse("has a").unwrap(), Some(Op::Has(path!["a"])));
        assert_eq!(Op::parse("exists a").unwrap(), Some(Op::Exists(path!["a"])));
        assert_eq!(Op::parse("size").unwrap(), Some(Op::Size));
        assert_eq!(Op::parse("stats").unwrap(), Some(Op::Stats));
        assert_eq!(Op::parse("flush").unwrap(), Some(Op::Flush));
        assert_eq!(Op::parse("dump").unwrap(), Some(Op::Dump));
    }

    #[test]
    fn values_are_json_or_strings() {
        assert_eq!(
            Op::parse("set k {\"x\": [1, null]}").unwrap(),
            Some(Op::Set(path!["k"], json!({ "x": [1, null] })))
        );
        assert_eq!(
            Op::parse("set k hello world").unwrap(),
            Some(Op::Set(path!["k"], json!("hello world")))
        );
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        assert_eq!(Op::parse("").unwrap(), None);
        assert_eq!(Op::parse("   # just a note").unwrap(), None);
        assert_eq!(Op::parse("size # trailing").unwrap(), Some(Op::Size));
        assert_eq!(Op::parse("get a.b # note").unwrap(), Some(Op::Get(path!["a", "b"])));
        assert_eq!(Op::parse("use 3 #switch").unwrap(), Some(Op::Use(Identifier::from(3))));
    }

    #[test]
    fn hash_inside_set_value_is_kept() {
        assert_eq!(
            Op::parse("set k \"a#b\"").unwrap(),
            Some(Op::Set(path!["k"], json!("a#b")))
        );
        assert_eq!(
            Op::parse("set k {\"tag\": \"#1\"}").unwrap(),
            Some(Op::Set(path!["k"], json!({ "tag": "#1" })))
        );
        assert_eq!(
            Op::parse("set k issue #42").unwrap(),
            Some(Op::Set(path!["k"], json!("issue #42")))
        );
    }

    #[test]
    fn hash_inside_path_segment_is_not_a_comment() {
        assert_eq!(Op::parse("get tag#1").unwrap(), Some(Op::Get(path!["tag#1"])));
    }

    #[test]
    fn bad_lines_are_errors() {
        assert!(Op::parse("frobnicate").is_err());
        assert!(Op::parse("set onlypath").is_err());
        assert!(Op::parse("get a..b").is_err());
        assert!(Op::parse("get").is_err());
        assert!(Op::parse("use").is_err());
    }

    #[test]
    fn script_errors_name_the_line() {
        let err = parse_script("size\nbogus\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn json_objects_become_nodes() {
        let v = to_value(&json!({ "a": 1 }));
        assert_eq!(v.as_node().unwrap().get("a"), Some(Value::from(1)));
    }
}
