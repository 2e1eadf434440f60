#[cfg(test)]
mod pipeline_tests {
    use crate::parser::*;
    use crate::renderer::HeaderRenderer;
    use serde_json::json;

    fn structured(tree: serde_json::Value) -> Extraction {
        JsonExtractor.extract(&tree.to_string()).unwrap()
    }

    fn textual(dump: &str) -> Extraction {
        TextExtractor.extract(dump).unwrap()
    }

    fn render(structs: &StructMap) -> String {
        HeaderRenderer::default().render_with_include(structs, "input.h", "OUT_H_")
    }

    fn record(name: &str, fields: serde_json::Value) -> serde_json::Value {
        json!({
            "kind": "CXXRecordDecl",
            "name": name,
            "tagUsed": "struct",
            "completeDefinition": true,
            "inner": fields
        })
    }

    #[test]
    fn test_point_example_renders_one_block() {
        let extraction = structured(json!({
            "kind": "TranslationUnitDecl",
            "inner": [{
                "kind": "NamespaceDecl", "name": "ns",
                "inner": [record("Point", json!([
                    {"kind": "FieldDecl", "name": "x"},
                    {"kind": "FieldDecl", "name": "y"}
                ]))]
            }]
        }));
        let header = render(&extraction.structs);

        assert_eq!(header.matches("template <>").count(), 1);
        let x = header.find("SHM_DEFINE_FIELD(x);").unwrap();
        let y = header.find("SHM_DEFINE_FIELD(y);").unwrap();
        assert!(x < y);
        assert!(header.contains("        SHM_FIELD(ns::Point, x),\n        SHM_FIELD(ns::Point, y)\n"));
    }

    #[test]
    fn test_packed_example_in_both_modes() {
        let tree = structured(json!({
            "kind": "TranslationUnitDecl",
            "inner": [record("Packed", json!([
                {"kind": "FieldDecl", "name": "a", "isBitfield": true},
                {"kind": "FieldDecl", "name": "b"}
            ]))]
        }));
        let text = textual(
            "\
TranslationUnitDecl 0x1
|-CXXRecordDecl 0x2 <p.h:1:1, line:1:38> line:1:8 struct Packed definition
| |-FieldDecl 0x3 <col:17, col:25> col:21 a 'int' bitfield
| |-FieldDecl 0x4 <col:28, col:32> col:32 b 'int'
",
        );

        for extraction in [tree, text] {
            assert_eq!(extraction.structs.fields("Packed").unwrap(), &["b"]);
            assert_eq!(extraction.warnings.len(), 1);
            let message = extraction.warnings[0].to_string();
            assert!(message.contains("Packed"), "{}", message);
            assert!(message.ends_with("::a"), "{}", message);
            assert!(!render(&extraction.structs).contains("SHM_DEFINE_FIELD(a);"));
        }
    }

    #[test]
    fn test_same_struct_name_in_two_namespaces_renders_two_blocks() {
        let extraction = structured(json!({
            "kind": "TranslationUnitDecl",
            "inner": [
                {"kind": "NamespaceDecl", "name": "y", "inner": [
                    record("S", json!([{"kind": "FieldDecl", "name": "v"}]))
                ]},
                {"kind": "NamespaceDecl", "name": "x", "inner": [
                    record("S", json!([{"kind": "FieldDecl", "name": "v"}]))
                ]}
            ]
        }));
        let header = render(&extraction.structs);

        assert_eq!(extraction.structs.len(), 2);
        assert_eq!(header.matches("SHM_DEFINE_FIELD(v);").count(), 1);
        let x = header.find("StructMeta<x::S>").unwrap();
        let y = header.find("StructMeta<y::S>").unwrap();
        assert!(x < y);
    }

    #[test]
    fn test_both_modes_render_identically() {
        let tree = structured(json!({
            "kind": "TranslationUnitDecl",
            "inner": [
                {"kind": "TypedefDecl", "name": "__int128_t", "isImplicit": true},
                {"kind": "NamespaceDecl", "name": "app", "inner": [
                    record("Config", json!([
                        {"kind": "FieldDecl", "name": "version"},
                        {"kind": "FieldDecl", "name": "flags"}
                    ])),
                    record("Entry", json!([
                        {"kind": "FieldDecl", "name": "key"},
                        {"kind": "FieldDecl", "name": "value"}
                    ]))
                ]}
            ]
        }));
        let text = textual(
            "\
TranslationUnitDecl 0x1 <<invalid sloc>> <invalid sloc>
|-TypedefDecl 0x2 <<invalid sloc>> <invalid sloc> implicit __int128_t '__int128'
|-NamespaceDecl 0x3 <app.h:1:1, line:12:1> line:1:11 app
| |-CXXRecordDecl 0x4 <line:2:1, line:5:1> line:2:8 struct Config definition
| | |-CXXRecordDecl 0x5 <col:1, col:8> col:8 implicit struct Config
| | |-FieldDecl 0x6 <line:3:5, col:14> col:14 version 'unsigned int'
| | |-FieldDecl 0x7 <line:4:5, col:14> col:14 flags 'unsigned int'
| |-CXXRecordDecl 0x8 <line:7:1, line:10:1> line:7:8 struct Entry definition
| | |-CXXRecordDecl 0x9 <col:1, col:8> col:8 implicit struct Entry
| | |-FieldDecl 0xa <line:8:5, col:9> col:9 key 'int'
| | |-FieldDecl 0xb <line:9:5, col:12> col:12 value 'double'
| |-VarDecl 0xc <line:11:1, col:12> col:12 registry 'int'
",
        );

        assert_eq!(render(&tree.structs), render(&text.structs));
    }
}
