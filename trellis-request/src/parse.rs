//! The request mini-language.
//!
//! Accepted forms, all equivalent to the selections they name:
//!
//! ```text
//! ""                                  the whole structure
//! "value,alarm"                       bare field list
//! "field(value,alarm.severity)"       the same, wrapped
//! "power{value,alarm}"                sub-selection block
//! "timeStamp[algorithm=onChange]"     option annotations
//! ```
//!
//! Dotted paths expand to nested selection nodes. Transport-level request
//! sections (`record[...]`, `getField(...)`, `putField(...)`) are not
//! interpreted by this layer and are rejected.

use trellis_error::{TrellisResult, trellis_bail, trellis_err};
use trellis_introspect::FieldName;

use crate::{SelectionNode, SelectionSpec};

/// Parse a request string into a [`SelectionSpec`].
///
/// Fails with a descriptive message on malformed input; an empty (or
/// all-whitespace) request is the wildcard.
pub fn create_request(text: &str) -> TrellisResult<SelectionSpec> {
    SelectionSpec::parse(text)
}

impl SelectionSpec {
    /// Parse a request string; see [`create_request`].
    pub fn parse(text: &str) -> TrellisResult<Self> {
        let mut cur = Cursor::new(text);
        cur.skip_ws();
        if cur.at_end() {
            return Ok(SelectionSpec::wildcard());
        }

        let mut root = SelectionNode::new();
        if cur.eat_field_keyword() {
            cur.expect('(')?;
            parse_list(&mut cur, &mut root)?;
            cur.expect(')')?;
        } else {
            parse_list(&mut cur, &mut root)?;
        }
        cur.skip_ws();
        if !cur.at_end() {
            trellis_bail!(
                InvalidSelection: "unexpected text at position {}: '{}'",
                cur.pos,
                cur.rest()
            );
        }
        // an explicit empty selection ("field()") selects everything,
        // exactly like the empty request
        Ok(SelectionSpec::from_root(root))
    }
}

fn parse_list(cur: &mut Cursor, node: &mut SelectionNode) -> TrellisResult<()> {
    loop {
        cur.skip_ws();
        if matches!(cur.peek(), None | Some(')') | Some('}')) {
            return Ok(());
        }
        parse_item(cur, node)?;
        cur.skip_ws();
        if cur.peek() == Some(',') {
            cur.bump();
        } else {
            return Ok(());
        }
    }
}

fn parse_item(cur: &mut Cursor, parent: &mut SelectionNode) -> TrellisResult<()> {
    let mut path = vec![cur.parse_name()?];
    while cur.peek() == Some('.') {
        cur.bump();
        path.push(cur.parse_name()?);
    }

    let mut node = SelectionNode::new();
    if cur.peek() == Some('[') {
        parse_options(cur, &mut node)?;
    }
    if cur.peek() == Some('{') {
        cur.bump();
        parse_list(cur, &mut node)?;
        cur.expect('}')?;
    }

    parent.add_path(&path, node);
    Ok(())
}

fn parse_options(cur: &mut Cursor, node: &mut SelectionNode) -> TrellisResult<()> {
    cur.expect('[')?;
    loop {
        cur.skip_ws();
        if cur.peek() == Some(']') {
            cur.bump();
            return Ok(());
        }
        let name = cur.parse_name()?;
        cur.skip_ws();
        cur.expect('=')?;
        let value = cur.take_until(|c| c == ',' || c == ']');
        let value = value.trim().to_string();
        if value.is_empty() {
            trellis_bail!(
                InvalidSelection: "empty value for option '{}' at position {}", name, cur.pos
            );
        }
        node.add_option(name.to_string(), value);
        cur.skip_ws();
        if cur.peek() == Some(',') {
            cur.bump();
        }
    }
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn rest(&self) -> String {
        self.chars[self.pos..].iter().collect()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, c: char) -> TrellisResult<()> {
        self.skip_ws();
        match self.peek() {
            Some(found) if found == c => {
                self.bump();
                Ok(())
            }
            Some(found) => Err(trellis_err!(
                InvalidSelection: "expected '{}' at position {}, found '{}'", c, self.pos, found
            )),
            None => Err(trellis_err!(
                InvalidSelection: "expected '{}' at position {}, found end of request", c, self.pos
            )),
        }
    }

    /// `field` is a keyword only when followed by an opening parenthesis;
    /// otherwise it is an ordinary field name.
    fn eat_field_keyword(&mut self) -> bool {
        let start = self.pos;
        if self.rest().starts_with("field") {
            self.pos += "field".len();
            self.skip_ws();
            if self.peek() == Some('(') {
                return true;
            }
        }
        self.pos = start;
        false
    }

    fn parse_name(&mut self) -> TrellisResult<FieldName> {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.bump();
        }
        if self.pos == start {
            match self.peek() {
                Some(found) => trellis_bail!(
                    InvalidSelection: "expected field name at position {}, found '{}'",
                    self.pos,
                    found
                ),
                None => trellis_bail!(
                    InvalidSelection: "expected field name at position {}, found end of request",
                    self.pos
                ),
            }
        }
        Ok(self.chars[start..self.pos].iter().collect::<String>().into())
    }

    fn take_until(&mut self, stop: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| !stop(c)) {
            self.bump();
        }
        self.chars[start..self.pos].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_wildcard() {
        assert!(create_request("").unwrap().is_wildcard());
        assert!(create_request("   ").unwrap().is_wildcard());
        assert!(create_request("field()").unwrap().is_wildcard());
    }

    #[test]
    fn bare_and_wrapped_lists_agree() {
        let bare = create_request("alarm,timeStamp,power.value").unwrap();
        let wrapped = create_request("field(alarm,timeStamp,power.value)").unwrap();
        assert_eq!(bare, wrapped);

        let root = bare.root();
        assert!(root.field("alarm").unwrap().is_wildcard());
        assert!(root.field("timeStamp").is_some());
        assert!(root.field("power").unwrap().field("value").is_some());
    }

    #[test]
    fn nested_blocks() {
        let spec = create_request("field(a.b{c.d})").unwrap();
        let b = spec.root().field("a").unwrap().field("b").unwrap();
        assert!(b.field("c").unwrap().field("d").is_some());

        let spec = create_request("field(power{value,alarm})").unwrap();
        let power = spec.root().field("power").unwrap();
        assert_eq!(power.fields().len(), 2);
    }

    #[test]
    fn options() {
        let spec =
            create_request("field(timeStamp[algorithm=onChange,causeMonitor=false],value)")
                .unwrap();
        let ts = spec.root().field("timeStamp").unwrap();
        assert_eq!(
            ts.options(),
            &[
                ("algorithm".to_string(), "onChange".to_string()),
                ("causeMonitor".to_string(), "false".to_string())
            ]
        );
        assert!(ts.is_wildcard());

        let spec = create_request("field(a.b[x=y]{c.d})").unwrap();
        let b = spec.root().field("a").unwrap().field("b").unwrap();
        assert_eq!(b.options(), &[("x".to_string(), "y".to_string())]);
        assert!(b.field("c").is_some());
    }

    #[test]
    fn field_as_name_vs_keyword() {
        // not followed by '(' - an ordinary field named "field"
        let spec = create_request("field").unwrap();
        assert!(spec.root().field("field").is_some());
    }

    #[test]
    fn whitespace_tolerated() {
        let spec = create_request(" field( a , b.c ) ").unwrap();
        assert!(spec.root().field("a").is_some());
        assert!(spec.root().field("b").unwrap().field("c").is_some());
    }

    #[test]
    fn malformed_requests() {
        for bad in [
            "field(a",
            "field(a))",
            "field(a..b)",
            "a{b",
            "a}b",
            "field(a[x])",
            "field(a[x=])",
            "field(,a)",
            "record[process=true]field(a)",
        ] {
            let err = create_request(bad).unwrap_err();
            assert_eq!(err.kind(), "invalid_selection", "request: {bad}");
        }
    }
}
