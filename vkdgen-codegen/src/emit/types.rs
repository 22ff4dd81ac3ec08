use tracing::debug;
use vkdgen_ir::{BasicType, FuncPointer, Handle, RawType};

use crate::{GeneratorOptions, ReservedWords, Section, SectionBuffer, normalize, rewrite};

/// `alias VkFlags = uint;`
///
/// Names already covered by the integer alias table are skipped, since the
/// preamble declares them.
pub fn basic_type(out: &mut SectionBuffer, options: &GeneratorOptions, ty: &BasicType) {
    if options.integer_alias(&ty.name).is_some() {
        debug!(name = %ty.name, "basic type shadowed by integer alias table");
        return;
    }
    let underlying = options
        .integer_alias(&ty.underlying)
        .unwrap_or(&ty.underlying);
    out.set_section(Section::BaseType)
        .line(format!("alias {} = {};", ty.name, underlying));
}

/// `mixin(VK_DEFINE_HANDLE!"VkInstance");`
pub fn handle(out: &mut SectionBuffer, handle: &Handle) {
    out.set_section(Section::Handle).line(format!(
        "mixin({}!\"{}\");",
        handle.kind.macro_name(),
        handle.name
    ));
}

/// `alias PFN_vkFreeFunction = void function(void* pUserData, void* pMemory);`
pub fn func_pointer(out: &mut SectionBuffer, options: &GeneratorOptions, fp: &FuncPointer) {
    let params = func_pointer_params(&fp.params, &options.reserved_words);
    out.set_section(Section::FuncPtr).line(format!(
        "alias {} = {} function({});",
        fp.name,
        rewrite(&fp.return_type),
        params.join(", ")
    ));
}

/// Rebuild a parameter list from the raw declaration tail.
///
/// The tail mixes free text (qualifiers, pointer stars, parameter names) with
/// `<type>` fragments, so parameters are recovered from the concatenated text:
/// split on commas, last word is the name, the rest is the type.
fn func_pointer_params(tail: &RawType, reserved: &ReservedWords) -> Vec<String> {
    let text: String = tail.tokens().iter().map(|t| t.text.as_str()).collect();
    let text = text.trim();
    let text = text.strip_prefix(")(").unwrap_or(text);
    let text = text.strip_suffix(");").unwrap_or(text);
    let text = normalize(text);
    if text.is_empty() || text == "void" {
        return Vec::new();
    }

    text.split(',')
        .map(|param| {
            let param = normalize(param);
            match param.rsplit_once(' ') {
                Some((ty, name)) => format!("{} {}", rewrite(ty), reserved.escape(name)),
                None => rewrite(&param),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use vkdgen_ir::{HandleKind, Token};

    use super::*;

    fn emit_fp(tail: Vec<Token>, ret: &str) -> String {
        let mut out = SectionBuffer::default();
        let fp = FuncPointer {
            name: "PFN_test".into(),
            return_type: ret.into(),
            params: RawType::new(tail),
        };
        func_pointer(&mut out, &GeneratorOptions::default(), &fp);
        out.lines(Section::FuncPtr).join("\n")
    }

    #[test]
    fn test_basic_type_alias() {
        let mut out = SectionBuffer::default();
        let options = GeneratorOptions::default();
        basic_type(
            &mut out,
            &options,
            &BasicType {
                name: "VkBool32".into(),
                underlying: "uint32_t".into(),
            },
        );
        basic_type(
            &mut out,
            &options,
            &BasicType {
                name: "VkDeviceSize".into(),
                underlying: "VkFlags64".into(),
            },
        );
        assert_eq!(
            out.lines(Section::BaseType),
            ["alias VkBool32 = uint;", "alias VkDeviceSize = VkFlags64;"]
        );
    }

    #[test]
    fn test_basic_type_in_alias_table_is_skipped() {
        let mut out = SectionBuffer::default();
        basic_type(
            &mut out,
            &GeneratorOptions::default(),
            &BasicType {
                name: "uint32_t".into(),
                underlying: "unsigned int".into(),
            },
        );
        assert!(out.lines(Section::BaseType).is_empty());
    }

    #[test]
    fn test_handle_kinds() {
        let mut out = SectionBuffer::default();
        handle(
            &mut out,
            &Handle {
                name: "VkInstance".into(),
                kind: HandleKind::Dispatchable,
            },
        );
        handle(
            &mut out,
            &Handle {
                name: "VkFence".into(),
                kind: HandleKind::NonDispatchable,
            },
        );
        assert_eq!(
            out.lines(Section::Handle),
            [
                "mixin(VK_DEFINE_HANDLE!\"VkInstance\");",
                "mixin(VK_DEFINE_NON_DISPATCHABLE_HANDLE!\"VkFence\");",
            ]
        );
    }

    #[test]
    fn test_func_pointer_void_params() {
        let line = emit_fp(vec![Token::text(")("), Token::ty("void"), Token::text(");")], "void");
        assert_eq!(line, "alias PFN_test = void function();");
    }

    #[test]
    fn test_func_pointer_spaced_void_params() {
        let line = emit_fp(vec![Token::text(")( void );")], "void");
        assert_eq!(line, "alias PFN_test = void function();");
    }

    #[test]
    fn test_func_pointer_multiline_params() {
        let line = emit_fp(
            vec![
                Token::text(")(\n    "),
                Token::ty("void"),
                Token::text("*                                       pUserData,\n    "),
                Token::ty("size_t"),
                Token::text("                                      size,\n    "),
                Token::ty("VkSystemAllocationScope"),
                Token::text("                     allocationScope);"),
            ],
            "void*",
        );
        assert_eq!(
            line,
            "alias PFN_test = void* function(void* pUserData, size_t size, VkSystemAllocationScope allocationScope);"
        );
    }

    #[test]
    fn test_func_pointer_const_params() {
        let line = emit_fp(
            vec![
                Token::text(")(\n    "),
                Token::ty("VkDebugReportFlagsEXT"),
                Token::text("                       flags,\n    const "),
                Token::ty("char"),
                Token::text("*                                 pMessage,\n    "),
                Token::ty("void"),
                Token::text("*                                       pUserData);"),
            ],
            "VkBool32",
        );
        assert_eq!(
            line,
            "alias PFN_test = VkBool32 function(VkDebugReportFlagsEXT flags, const(char)* pMessage, void* pUserData);"
        );
    }

    #[test]
    fn test_func_pointer_param_names_are_escaped() {
        let line = emit_fp(
            vec![Token::text(")("), Token::ty("uint32_t"), Token::text(" module);")],
            "void",
        );
        assert_eq!(line, "alias PFN_test = void function(uint32_t module_);");
    }
}
