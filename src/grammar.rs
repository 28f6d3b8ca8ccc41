use tree_sitter::Language;

unsafe extern "C" {
    fn tree_sitter_gn() -> Language;
}

/// The GN grammar, compiled from `src/parser.c` and `src/scanner.c`.
///
/// Every call returns a handle to the same static descriptor that
/// `bindings/c/tree_sitter_gn.h` declares for C and C++ callers.
#[must_use]
pub fn language() -> Language {
    unsafe { tree_sitter_gn() }
}

/// The content of `node-types.json` for this grammar.
pub const NODE_TYPES: &str = include_str!("node-types.json");

#[cfg(test)]
mod tests {
    use super::*;

    unsafe extern "C" {
        fn gn_header_check_language() -> *const std::ffi::c_void;
        fn gn_header_check_same_handle() -> std::ffi::c_int;
    }

    #[test]
    fn accessor_is_stable() {
        let a = language();
        let b = language();
        assert_eq!(a, b);
        assert_eq!(a.name(), Some("gn"));
        assert_eq!(a.abi_version(), tree_sitter::LANGUAGE_VERSION);
    }

    #[test]
    fn header_resolves_to_the_same_descriptor() {
        let from_cpp = unsafe { gn_header_check_language() };
        assert!(!from_cpp.is_null());
        assert_eq!(from_cpp, language().into_raw().cast::<std::ffi::c_void>());
        assert_eq!(unsafe { gn_header_check_same_handle() }, 1);
    }

    #[test]
    fn parser_accepts_the_language() {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&language()).unwrap();
        let tree = parser.parse("a = 1", None).unwrap();
        assert_eq!(tree.root_node().kind(), "source_file");
    }

    #[test]
    fn kind_lookup() {
        let lang = language();
        let id = lang.id_for_node_kind("binary_expression", true);
        assert_eq!(lang.node_kind_for_id(id), Some("binary_expression"));
        assert!(lang.node_kind_is_named(id));
        assert_eq!(lang.id_for_node_kind("binary_expression", false), 0);
        assert_ne!(lang.id_for_node_kind("(", false), 0);
        assert_eq!(lang.node_kind_for_id(1000), None);
    }

    #[test]
    fn fields_are_one_based() {
        let lang = language();
        assert_eq!(lang.field_count(), 13);
        assert_eq!(lang.field_name_for_id(0), None);
        assert_eq!(lang.field_name_for_id(1), Some("alternative"));
        let id = lang.field_id_for_name("condition").map(std::num::NonZeroU16::get);
        assert_eq!(id, Some(3));
    }

    #[test]
    fn supertypes_are_hidden() {
        let lang = language();
        let supertypes = lang.supertypes();
        assert_eq!(supertypes.len(), 2);
        for id in supertypes {
            assert!(lang.node_kind_is_supertype(*id));
            assert!(!lang.node_kind_is_visible(*id));
        }
        let expression = lang.id_for_node_kind("expression", true);
        let names: Vec<_> = lang
            .subtypes_for_supertype(expression)
            .iter()
            .filter_map(|id| lang.node_kind_for_id(*id))
            .collect();
        assert_eq!(
            names,
            ["binary_expression", "primary_expression", "unary_expression"]
        );
    }

    #[test]
    fn node_types_name_the_root() {
        assert!(NODE_TYPES.contains("\"type\": \"source_file\""));
        assert!(NODE_TYPES.contains("\"root\": true"));
    }
}
