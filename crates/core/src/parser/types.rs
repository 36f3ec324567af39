use super::Parser;
use crate::ast::Type;
use crate::error::ParseError;
use tracing::trace;

impl<'c, 'a> Parser<'c, 'a> {
    // -- Type parsing -------------------------------------------

    /// `list of T`, `N of T` or a bare path `T`.
    ///
    /// The `list` form is recognized speculatively: the leading word is
    /// scanned and, if it is anything but `list`, the cursor is rewound to
    /// where the type began and the input is read again as a path.
    pub(super) fn parse_type(&mut self, context: &str) -> Result<Type, ParseError> {
        self.cur.skip_whitespace_and_comments();
        let start = self.cur.save();

        match self.cur.scan_identifier(context) {
            // `list::Foo` is an ordinary path, not the list form.
            Ok(word) if word == "list" && self.cur.current() != ':' => {
                self.expect_keyword("of", context, "Expected 'of' after 'list'")?;
                let name = self.cur.scan_path(context)?;
                trace!(%name, "list type");
                return Ok(Type::list(name, None));
            }
            _ => self.cur.restore(start),
        }

        if self.cur.current().is_ascii_digit() {
            let count = self.cur.scan_integer(context)?;
            self.expect_keyword("of", context, "Expected 'of' after list count")?;
            let name = self.cur.scan_path(context)?;
            trace!(%name, count, "fixed list type");
            return Ok(Type::list(name, Some(count)));
        }

        let name = self.cur.scan_path(context)?;
        trace!(%name, "scalar type");
        Ok(Type::scalar(name))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Type;
    use crate::error::ParseError;
    use crate::parser::parse;

    fn property_type(ty: &str) -> Result<Type, ParseError> {
        let ast = parse(&format!("data D {{ field: {} }};", ty))?;
        let node = ast.first().unwrap();
        let prop = node.properties().unwrap();
        Ok(prop.ty().clone())
    }

    #[test]
    fn scalar() {
        let t = property_type("int").unwrap();
        assert_eq!(t.name(), "int");
        assert!(!t.is_list());
        assert!(t.count().is_none());
    }

    #[test]
    fn list_of() {
        let t = property_type("list of int").unwrap();
        assert_eq!(t.name(), "int");
        assert!(t.is_list());
        assert!(t.count().is_none());
    }

    #[test]
    fn counted_list() {
        let t = property_type("5 of int").unwrap();
        assert_eq!(t.name(), "int");
        assert!(t.is_list());
        assert_eq!(t.count(), Some(5));
    }

    #[test]
    fn element_types_may_be_paths() {
        let t = property_type("list of core::time::Instant").unwrap();
        assert_eq!(t.name(), "core::time::Instant");
        let t = property_type("12 of a::B").unwrap();
        assert_eq!((t.name(), t.count()), ("a::B", Some(12)));
    }

    #[test]
    fn words_starting_with_list_are_plain_types() {
        let t = property_type("listing").unwrap();
        assert_eq!(t.name(), "listing");
        assert!(t.is_scalar());

        let t = property_type("list::Node").unwrap();
        assert_eq!(t.name(), "list::Node");
        assert!(t.is_scalar());
    }

    #[test]
    fn rewind_restores_line_tracking() {
        let ast = parse("data D {\n  a:\n    Thing,\n  b: list\n of int };").unwrap();
        let node = ast.first().unwrap();
        let a = node.properties().unwrap();
        assert_eq!(a.ty().name(), "Thing");
        let b = a.next().unwrap();
        assert_eq!(b.ty().to_string(), "list of int");
    }

    #[test]
    fn list_without_of() {
        let e = property_type("list int").unwrap_err();
        assert_eq!(e.message, "Expected 'of' after 'list'");
        assert_eq!(e.column, 22);
    }

    #[test]
    fn count_without_of() {
        let e = property_type("5 int").unwrap_err();
        assert_eq!(e.message, "Expected 'of' after list count");
        assert_eq!(e.column, 19);
    }

    #[test]
    fn missing_type() {
        let e = property_type("").unwrap_err();
        assert_eq!(e.message, "Expected path in context: property type");
    }
}
