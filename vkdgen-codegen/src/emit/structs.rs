use vkdgen_ir::Struct;

use crate::{
    GeneratorOptions, Section, SectionBuffer,
    align::{column_width, pad},
    bit_width, render_type,
};

/// One emitted member line. Consecutive bitfields sharing a type are packed
/// into a single member of that type, named after the fields it holds.
struct Row {
    ty: String,
    fields: Vec<(String, Option<u32>)>,
}

impl Row {
    fn name(&self) -> String {
        let names: Vec<&str> = self.fields.iter().map(|(name, _)| name.as_str()).collect();
        names.join("_")
    }

    fn comment(&self) -> Option<String> {
        let packed: Vec<String> = self
            .fields
            .iter()
            .filter_map(|(name, width)| width.map(|w| format!("{name}:{w}")))
            .collect();
        (!packed.is_empty()).then(|| format!(" // {}", packed.join(" ")))
    }

    /// Bits still free, if this row is a bitfield pack of `ty`.
    fn free_bits(&self, ty: &str) -> Option<u32> {
        if self.ty != ty {
            return None;
        }
        let mut used = 0;
        for (_, width) in &self.fields {
            used += (*width)?;
        }
        storage_bits(ty).checked_sub(used)
    }
}

/// Bit size of a packed bitfield's storage type, `32` when the name does not say.
fn storage_bits(ty: &str) -> u32 {
    ty.trim_end_matches("_t")
        .trim_start_matches('u')
        .strip_prefix("int")
        .and_then(|bits| bits.parse().ok())
        .unwrap_or(32)
}

fn rows(options: &GeneratorOptions, decl: &Struct) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    for member in &decl.members {
        let ty = render_type(&member.ty);
        let name = options.reserved_words.escape(&member.name).to_string();
        let width = bit_width(&member.ty);
        if let Some(width) = width {
            let fits = rows
                .last()
                .and_then(|row| row.free_bits(&ty))
                .is_some_and(|free| free >= width);
            if let Some(row) = rows.last_mut().filter(|_| fits) {
                row.fields.push((name, Some(width)));
                continue;
            }
        }
        rows.push(Row {
            ty,
            fields: vec![(name, width)],
        });
    }
    rows
}

/// Emit a struct or union, one member per line, names aligned on the widest type.
pub fn structure(out: &mut SectionBuffer, options: &GeneratorOptions, decl: &Struct) {
    let rows = rows(options, decl);
    let width = column_width(rows.iter().map(|row| row.ty.as_str()));
    let keyword = if decl.is_union { "union" } else { "struct" };

    out.set_section(Section::Struct)
        .line(format!("{keyword} {} {{", decl.name));
    {
        let mut body = out.indented();
        for row in &rows {
            body.line(format!(
                "{} {};{}",
                pad(&row.ty, width),
                row.name(),
                row.comment().unwrap_or_default()
            ));
        }
    }
    out.line("}");
}
