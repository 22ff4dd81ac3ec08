use vkdgen_ir::Command;

use crate::{
    CommandRecord, DispatchGroup, GeneratorOptions, Section, SectionBuffer,
    align::{column_width, pad},
    render_type, rewrite,
};

/// Emit one function pointer alias per recorded command, in discovery order.
///
/// ```text
/// extern(C) {
///     alias PFN_vkDestroyInstance = void function (VkInstance                    instance,
///                                                  const(VkAllocationCallbacks)* pAllocator);
/// }
/// ```
pub fn command_aliases(out: &mut SectionBuffer, options: &GeneratorOptions, record: &CommandRecord) {
    out.set_section(Section::Cmd).line("extern(C) {");
    {
        let mut body = out.indented();
        for command in record.commands() {
            command_alias(&mut body, options, command);
        }
    }
    out.line("}");
}

fn command_alias(out: &mut SectionBuffer, options: &GeneratorOptions, command: &Command) {
    let params: Vec<(String, &str)> = command
        .params
        .iter()
        .map(|p| (render_type(&p.ty), options.reserved_words.escape(&p.name)))
        .collect();
    let head = format!(
        "alias {}{} = {} function (",
        options.command_prefix,
        command.name,
        rewrite(&command.return_type)
    );

    match params.as_slice() {
        [] => {
            out.line(format!("{head});"));
        }
        [(ty, name)] => {
            out.line(format!("{head}{ty} {name});"));
        }
        _ => {
            let width = column_width(params.iter().map(|(ty, _)| ty.as_str()));
            let continuation = " ".repeat(head.len());
            let last = params.len() - 1;
            for (i, (ty, name)) in params.iter().enumerate() {
                let lead = if i == 0 { &head } else { &continuation };
                let end = if i == last { ");" } else { "," };
                out.line(format!("{lead}{} {name}{end}", pad(ty, width)));
            }
        }
    }
}

struct Loader {
    struct_name: &'static str,
    comment: &'static str,
    handle: Option<(&'static str, &'static str)>,
    resolver_command: &'static str,
    resolver: &'static str,
}

impl Loader {
    fn for_group(group: DispatchGroup) -> Self {
        match group {
            DispatchGroup::Global => Self {
                struct_name: "VkGlobalCmds",
                comment: "Global commands",
                handle: None,
                resolver_command: "vkGetInstanceProcAddr",
                resolver: "getInstanceProcAddr",
            },
            DispatchGroup::Instance => Self {
                struct_name: "VkInstanceCmds",
                comment: "Instance commands",
                handle: Some(("VkInstance", "instance")),
                resolver_command: "vkGetInstanceProcAddr",
                resolver: "getInstanceProcAddr",
            },
            DispatchGroup::Device => Self {
                struct_name: "VkDeviceCmds",
                comment: "Device commands",
                handle: Some(("VkDevice", "device")),
                resolver_command: "vkGetDeviceProcAddr",
                resolver: "getDeviceProcAddr",
            },
        }
    }
}

/// Emit one loader struct per non-empty dispatch group.
///
/// Each struct holds a function pointer per command of its group and a
/// `load` member resolving them through the group's `GetProcAddr`.
pub fn dispatch_tables(out: &mut SectionBuffer, options: &GeneratorOptions, record: &CommandRecord) {
    out.set_section(Section::Cmd);
    for group in DispatchGroup::ALL {
        let commands: Vec<&Command> = record.group(group).collect();
        if commands.is_empty() {
            continue;
        }
        let loader = Loader::for_group(group);
        let fields: Vec<(String, &str)> = commands
            .iter()
            .map(|c| {
                (
                    format!("{}{}", options.command_prefix, c.name),
                    options.reserved_words.escape(field_name(&c.name)),
                )
            })
            .collect();
        let type_width = column_width(fields.iter().map(|(ty, _)| ty.as_str()));
        let name_width = column_width(fields.iter().map(|(_, name)| *name));

        let mut load_params = Vec::new();
        if let Some((ty, name)) = loader.handle {
            load_params.push(format!("{ty} {name}"));
        }
        load_params.push(format!(
            "{}{} {}",
            options.command_prefix, loader.resolver_command, loader.resolver
        ));
        let handle_arg = loader.handle.map_or("null", |(_, name)| name);

        out.blank();
        out.line(format!("// {}", loader.comment));
        out.blank();
        out.line(format!("struct {} {{", loader.struct_name));
        {
            let mut body = out.indented();
            for (ty, name) in &fields {
                body.line(format!("{} {};", pad(ty, type_width), name));
            }
            body.blank();
            body.line(format!("void load({}) {{", load_params.join(", ")));
            {
                let mut load = body.indented();
                for ((ty, name), command) in fields.iter().zip(&commands) {
                    load.line(format!(
                        "{} = cast({}){}({}, \"{}\");",
                        pad(name, name_width),
                        ty,
                        loader.resolver,
                        handle_arg,
                        command.name
                    ));
                }
            }
            body.line("}");
        }
        out.line("}");
    }
}

/// `vkCreateInstance` → `CreateInstance`.
fn field_name(command: &str) -> &str {
    match command.strip_prefix("vk") {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => rest,
        _ => command,
    }
}
