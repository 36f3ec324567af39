//! Recursive-descent parser over a [`Cursor`].
//! One function per production; each either returns a fully built fragment
//! or the first error, in which case everything built so far is dropped.

use crate::ast::{Ast, Node};
use crate::error::ParseError;
use crate::lexer::Cursor;
use crate::options::ParseOptions;
use tracing::debug;

mod attributes;
mod constructs;
mod service;
mod types;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'c, 'a> {
    cur: &'c mut Cursor<'a>,
}

impl<'c, 'a> Parser<'c, 'a> {
    fn new(cur: &'c mut Cursor<'a>) -> Self {
        Parser { cur }
    }

    /// Skip trivia, then consume `c` or fail with `message`.
    fn expect(&mut self, c: char, message: &str) -> Result<(), ParseError> {
        self.cur.skip_whitespace_and_comments();
        if self.cur.eat(c) {
            Ok(())
        } else {
            Err(self.cur.error(message))
        }
    }

    /// Consume the bare word `keyword`. Reports at the start of whatever
    /// stands there instead.
    fn expect_keyword(
        &mut self,
        keyword: &str,
        context: &str,
        message: &str,
    ) -> Result<(), ParseError> {
        self.cur.skip_whitespace_and_comments();
        let start = self.cur.save();
        match self.cur.scan_identifier(context) {
            Ok(word) if word == keyword => Ok(()),
            _ => Err(self.cur.error_at(start, message)),
        }
    }

    /// An identifier naming a declaration; `message` when none is present.
    fn expect_name(&mut self, context: &str, message: &str) -> Result<String, ParseError> {
        self.cur.skip_whitespace_and_comments();
        if !self.cur.at_identifier() {
            return Err(self.cur.error(message));
        }
        self.cur.scan_identifier(context)
    }

    fn expect_path(&mut self, context: &str, message: &str) -> Result<String, ParseError> {
        self.cur.skip_whitespace_and_comments();
        if !self.cur.at_path() {
            return Err(self.cur.error(message));
        }
        self.cur.scan_path(context)
    }

    // -- Top-level ----------------------------------------------

    fn parse_document(&mut self) -> Result<Ast, ParseError> {
        let mut nodes = Vec::new();
        self.cur.skip_whitespace_and_comments();
        while !self.cur.is_at_end() {
            nodes.push(self.parse_node()?);
            self.cur.skip_whitespace_and_comments();
        }
        if nodes.is_empty() {
            return Err(self.cur.error("Expected at least one node"));
        }
        debug!(nodes = nodes.len(), "parsed document");
        Ok(Ast::new(nodes))
    }

    fn parse_node(&mut self) -> Result<Node, ParseError> {
        let attributes = self.parse_attributes("node")?;
        self.cur.skip_whitespace_and_comments();
        let start = self.cur.save();
        let keyword = self.cur.scan_identifier("node")?;
        let kind = match keyword.as_str() {
            "import" => self.parse_import()?,
            "data" => self.parse_data()?,
            "enum" => self.parse_enum()?,
            "service" => self.parse_service()?,
            other => {
                return Err(self
                    .cur
                    .error_at(start, format!("Unknown node type '{}'", other)))
            }
        };
        let node = Node::new(attributes, kind);
        self.expect(
            ';',
            &format!("Expected ';' after {} declaration", node.node_type()),
        )?;
        debug!(
            node_type = %node.node_type(),
            name = node.name().or(node.import_path()).unwrap_or_default(),
            line = start.line(),
            "parsed node"
        );
        Ok(node)
    }
}

/// Parse a whole document with default options.
pub fn parse(source: &str) -> Result<Ast, ParseError> {
    parse_with_options(source, &ParseOptions::default())
}

pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<Ast, ParseError> {
    let mut cursor = Cursor::with_options(source, options.clone());
    parse_cursor(&mut cursor)
}

/// Parse from an existing cursor. On return the cursor sits where parsing
/// stopped: at the end of input on success, at the failure point otherwise.
pub fn parse_cursor(cursor: &mut Cursor<'_>) -> Result<Ast, ParseError> {
    let mut p = Parser::new(cursor);
    p.parse_document()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeType;

    fn err(src: &str) -> ParseError {
        parse(src).expect_err("parse should fail")
    }

    #[test]
    fn data_with_two_scalar_properties() {
        let ast = parse("data Person { name: string, age: int };").unwrap();
        assert_eq!(ast.len(), 1);
        let node = ast.first().unwrap();
        assert_eq!(node.node_type(), NodeType::Data);
        assert_eq!(node.data_name(), Some("Person"));

        let name = node.properties().unwrap();
        assert_eq!(name.name(), "name");
        assert_eq!(name.ty().name(), "string");
        assert!(name.ty().is_scalar());
        let age = name.next().unwrap();
        assert_eq!(age.name(), "age");
        assert_eq!(age.ty().name(), "int");
        assert!(age.ty().count().is_none());
        assert!(age.next().is_none());
    }

    #[test]
    fn enum_values_are_explicit_only() {
        let ast = parse("enum Color { Red = 1, Green, Blue };").unwrap();
        let node = ast.first().unwrap();
        assert_eq!(node.enum_name(), Some("Color"));
        let values: Vec<_> = node
            .enum_variants()
            .unwrap()
            .iter()
            .map(|v| (v.name(), v.value()))
            .collect();
        assert_eq!(
            values,
            [("Red", Some(1)), ("Green", None), ("Blue", None)]
        );
    }

    #[test]
    fn empty_enum_fails_at_closing_brace() {
        let e = err("enum Color {};");
        assert!(e.message.ends_with("Enum must have at least one variant"));
        assert_eq!((e.line, e.column), (1, 13));
    }

    #[test]
    fn empty_data_fails() {
        let e = err("data Empty { };");
        assert_eq!(e.message, "Data must have at least one property");
        assert_eq!(e.column, 14);
    }

    #[test]
    fn missing_colon_points_after_property_name() {
        let src = "data Person { name, age: int };";
        let e = err(src);
        assert_eq!(e.message, "Expected ':' after property name");
        let expected_col = src.find("name").unwrap() + "name".len() + 1;
        assert_eq!(e.column as usize, expected_col);
        assert_eq!(e.line, 1);
    }

    #[test]
    fn service_collects_each_kind_separately() {
        let ast = parse("service S { fn f(a: int) -> int; event e(); depends on a::b; };").unwrap();
        let node = ast.first().unwrap();
        assert_eq!(node.service_name(), Some("S"));

        let f = node.handlers().unwrap();
        assert_eq!(f.name(), "f");
        let a = f.arguments().unwrap();
        assert_eq!((a.name(), a.ty().name()), ("a", "int"));
        assert!(a.next().is_none());
        assert_eq!(f.return_type().map(|t| t.name()), Some("int"));
        assert!(f.next().is_none());

        let e = node.events().unwrap();
        assert_eq!(e.name(), "e");
        assert!(e.arguments().is_none());

        let dep = node.dependencies().unwrap();
        assert_eq!(dep.path(), "a::b");
        assert!(dep.next().is_none());
    }

    #[test]
    fn service_without_handlers_or_events_fails() {
        let e = err("service S { depends on a::b; };");
        assert_eq!(e.message, "Service must have at least one handler or event");
        assert_eq!(e.column, 30);
    }

    #[test]
    fn event_cannot_have_return_type() {
        let e = err("service S { event e() -> int; };");
        assert_eq!(e.message, "Expected ';' after service component");
        assert_eq!(e.column, 23);
    }

    #[test]
    fn unknown_service_keyword() {
        let e = err("service S { rpc f(); };");
        assert_eq!(e.message, "Expected 'depends', 'fn' or 'event' keyword");
        assert_eq!(e.column, 13);
    }

    #[test]
    fn depends_requires_on() {
        let e = err("service S { depends upon x; fn f(); };");
        assert_eq!(e.message, "Expected 'on' after 'depends'");
        assert_eq!(e.column, 21);
    }

    #[test]
    fn unknown_top_level_keyword() {
        let e = err("import a;\nstruct X { a: int };");
        assert_eq!(e.message, "Unknown node type 'struct'");
        assert_eq!((e.line, e.column), (2, 1));
    }

    #[test]
    fn missing_semicolon_names_the_declaration() {
        assert_eq!(
            err("import a::b").message,
            "Expected ';' after import declaration"
        );
        assert_eq!(
            err("data D { a: int }").message,
            "Expected ';' after data declaration"
        );
        assert_eq!(
            err("enum E { A }").message,
            "Expected ';' after enum declaration"
        );
        assert_eq!(
            err("service S { fn f(); }").message,
            "Expected ';' after service declaration"
        );
    }

    #[test]
    fn empty_and_comment_only_input() {
        assert_eq!(err("").message, "Expected at least one node");
        let e = err("// nothing here\n   \n");
        assert_eq!(e.message, "Expected at least one node");
        assert_eq!((e.line, e.column), (3, 1));
    }

    #[test]
    fn error_display_format() {
        let e = err("data Person { name, age: int };");
        assert_eq!(
            e.to_string(),
            "Error: Expected ':' after property name at line 1, column 19"
        );
    }

    #[test]
    fn multiple_nodes_keep_source_order() {
        let src = r#"
            // header comment
            import core::types;
            data A { x: int };
            enum B { One };
            service C { fn run(); };
        "#;
        let ast = parse(src).unwrap();
        let kinds: Vec<_> = ast.iter().map(|n| n.node_type()).collect();
        assert_eq!(
            kinds,
            [NodeType::Import, NodeType::Data, NodeType::Enum, NodeType::Service]
        );
        assert_eq!(ast.first().unwrap().import_path(), Some("core::types"));

        let mut walked = 0;
        let mut cursor = ast.first();
        while let Some(node) = cursor {
            walked += 1;
            cursor = node.next();
        }
        assert_eq!(walked, 4);
    }

    #[test]
    fn first_error_aborts_even_after_valid_nodes() {
        let e = err("data A { x: int };\ndata B { y };");
        assert_eq!(e.message, "Expected ':' after property name");
        assert_eq!((e.line, e.column), (2, 12));
    }

    #[test]
    fn reparsing_gives_equal_independent_trees() {
        let src = "#[x] data P { #[y(k = \"v\")] a: list of int };";
        let first = parse(src).unwrap();
        let second = parse(src).unwrap();
        assert_eq!(first, second);
        drop(first);
        assert_eq!(second.first().unwrap().data_name(), Some("P"));
    }

    #[test]
    fn parse_cursor_leaves_cursor_at_failure() {
        let mut cursor = Cursor::new("data P { a b };");
        let e = parse_cursor(&mut cursor).unwrap_err();
        assert_eq!(cursor.column(), e.column);
        assert_eq!(cursor.current(), 'b');
    }

    #[test]
    fn options_flow_into_diagnostics() {
        let opts = ParseOptions::default().with_max_token_len(3);
        let e = parse_with_options("enum Color { A };", &opts).unwrap_err();
        assert_eq!(
            e.message,
            "Identifier length exceeds maximum token size in context: node"
        );
        assert_eq!(e.column, 4);

        let opts = ParseOptions::default().with_max_error_len(8);
        let e = parse_with_options("data P { a b };", &opts).unwrap_err();
        assert_eq!(e.message, "Expected");
    }
}
