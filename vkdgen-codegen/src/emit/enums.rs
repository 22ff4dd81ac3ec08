use vkdgen_ir::EnumGroup;

use crate::{
    GeneratorOptions, Section, SectionBuffer,
    align::{column_width, pad},
    emit::normalize_literal,
};

/// Emit an enumeration block followed by one unqualified alias per member.
///
/// ```text
/// enum VkCullModeFlagBits : VkFlags {
///     VK_CULL_MODE_NONE      = 0,
///     VK_CULL_MODE_FRONT_BIT = 1,
/// }
/// enum VK_CULL_MODE_NONE      = VkCullModeFlagBits.VK_CULL_MODE_NONE;
/// enum VK_CULL_MODE_FRONT_BIT = VkCullModeFlagBits.VK_CULL_MODE_FRONT_BIT;
/// ```
pub fn enum_group(out: &mut SectionBuffer, options: &GeneratorOptions, group: &EnumGroup) {
    let width = column_width(group.members.iter().map(|m| m.name.as_str()));

    out.set_section(Section::Enum);
    match storage_type(options, group) {
        Some(storage) => out.line(format!("enum {} : {} {{", group.name, storage)),
        None => out.line(format!("enum {} {{", group.name)),
    };
    {
        let mut body = out.indented();
        for member in &group.members {
            body.line(format!(
                "{} = {},",
                pad(&member.name, width),
                normalize_literal(&member.value)
            ));
        }
    }
    out.line("}");

    for member in &group.members {
        out.line(format!(
            "enum {} = {}.{};",
            pad(&member.name, width),
            group.name,
            member.name
        ));
    }
    out.blank();
}

fn storage_type<'a>(options: &'a GeneratorOptions, group: &EnumGroup) -> Option<&'a str> {
    if group.is_bitmask && group.bit_width == Some(64) {
        Some(options.flags64_type.as_str())
    } else if group.name.ends_with(&options.flag_bits_marker) {
        Some(options.flags_type.as_str())
    } else {
        None
    }
}
