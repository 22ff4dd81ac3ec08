//! Generation driver.

use std::io::Write;

use eyre::{Context, Result};
use tracing::{debug, info, trace};
use vkdgen_ir::{Command, Entity, EntitySink};

use crate::{Classifier, CommandRecord, GeneratorOptions, Section, SectionBuffer, emit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
    Finished,
}

/// D bindings generator for one registry traversal.
///
/// Drive it through [`EntitySink`]: `begin` writes the preamble, each
/// `entity` is routed to its emitter (commands are only recorded), and
/// `end` runs the finishing pass. The result is then available through
/// [`render`](Self::render) or [`write_to`](Self::write_to).
///
/// # Example
///
/// ```
/// use vkdgen_codegen::{Generator, GeneratorOptions};
/// use vkdgen_ir::{EntitySink, Entity, EnumConstant};
///
/// let mut generator = Generator::new(GeneratorOptions::default());
/// generator.begin();
/// generator.entity(Entity::EnumConstant(EnumConstant {
///     name: "VK_TRUE".into(),
///     value: "1".into(),
/// }));
/// generator.end();
/// assert!(generator.render().contains("enum VK_TRUE = 1;"));
/// ```
pub struct Generator {
    options: GeneratorOptions,
    classifier: Classifier,
    out: SectionBuffer,
    record: CommandRecord,
    state: RunState,
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            classifier: options.classifier(),
            out: SectionBuffer::new(options.indent),
            record: CommandRecord::new(),
            state: RunState::Idle,
            options,
        }
    }

    /// Commands recorded so far, with their dispatch groups.
    pub fn record(&self) -> &CommandRecord {
        &self.record
    }

    pub fn render(&self) -> String {
        self.out.render()
    }

    /// Flush every section to `sink`.
    pub fn write_to<W: Write>(&self, sink: W) -> Result<()> {
        self.out
            .write_to(sink)
            .wrap_err("failed to write generated bindings")
    }

    fn begin_file(&mut self) {
        let out = &mut self.out;
        out.set_section(Section::GlobalDef);
        out.line(format!("/// {}", self.options.header));
        out.line(format!("module {};", self.options.module));
        out.blank();
        out.line("// Global definitions");
        out.blank();
        out.line("enum VK_DEFINE_HANDLE(string name) = ");
        out.indented()
            .line(r#""struct "~name~"_handle; alias "~name~" = "~name~"_handle*;";"#);
        out.blank();
        out.line("version(X86_64) {");
        {
            let mut body = out.indented();
            body.line("enum VK_DEFINE_NON_DISPATCHABLE_HANDLE(string name) = VK_DEFINE_HANDLE!name;");
            body.line("enum VK_NULL_ND_HANDLE = null;");
        }
        out.line("} else {");
        {
            let mut body = out.indented();
            body.line(r#"enum VK_DEFINE_NON_DISPATCHABLE_HANDLE(string name) = "alias "~name~" = ulong;";"#);
            body.line("enum VK_NULL_ND_HANDLE = 0;");
        }
        out.line("}");

        init_section(out, Section::BaseType, "Basic types definition");
        for (c_name, d_name) in &self.options.integer_aliases {
            out.line(format!("alias {c_name} = {d_name};"));
        }

        init_section(out, Section::FuncPtr, "Function pointers");
        out.line("extern(C) {");
        out.push_indent();

        init_section(out, Section::Const, "Constants");
        init_section(out, Section::Handle, "Handles");
        init_section(out, Section::Enum, "Enumerations");
        init_section(out, Section::Struct, "Structures");
        init_section(out, Section::Cmd, "Commands");
    }

    fn end_file(&mut self) {
        self.out.set_section(Section::FuncPtr).push_dedent().line("}");

        emit::command_aliases(&mut self.out, &self.options, &self.record);
        if self.options.dispatch_tables {
            emit::dispatch_tables(&mut self.out, &self.options, &self.record);
        }

        info!(
            commands = self.record.len(),
            structs = self.out.lines(Section::Struct).len(),
            enums = self.out.lines(Section::Enum).len(),
            "generated bindings for module {}",
            self.options.module
        );
    }

    fn generate_entity(&mut self, entity: Entity) {
        trace!(category = %entity.category(), name = entity.name(), "entity");
        match entity {
            Entity::BasicType(ty) => emit::basic_type(&mut self.out, &self.options, &ty),
            Entity::Handle(handle) => emit::handle(&mut self.out, &handle),
            Entity::FuncPointer(fp) => emit::func_pointer(&mut self.out, &self.options, &fp),
            Entity::EnumConstant(constant) => emit::enum_constant(&mut self.out, &constant),
            Entity::EnumGroup(group) => emit::enum_group(&mut self.out, &self.options, &group),
            Entity::Struct(decl) => emit::structure(&mut self.out, &self.options, &decl),
            Entity::Command(command) => self.record_command(command),
            Entity::Unknown { raw_category, name } => {
                debug!(category = %raw_category, %name, "skipping entity of unknown category");
            }
        }
    }

    fn record_command(&mut self, command: Command) {
        let group = self.classifier.classify_command(&command);
        let name = command.name.clone();
        if !self.record.insert(command, group) {
            debug!(%name, "command delivered twice, keeping the first");
        }
    }
}

impl EntitySink for Generator {
    fn begin(&mut self) {
        if self.state == RunState::Idle {
            self.begin_file();
            self.state = RunState::Running;
        }
    }

    fn entity(&mut self, entity: Entity) {
        self.begin();
        if self.state == RunState::Finished {
            debug!(name = entity.name(), "entity delivered after end of run");
            return;
        }
        self.generate_entity(entity);
    }

    fn end(&mut self) {
        self.begin();
        if self.state == RunState::Running {
            self.end_file();
            self.state = RunState::Finished;
        }
    }
}

fn init_section(out: &mut SectionBuffer, section: Section, comment: &str) {
    out.set_section(section);
    out.blank();
    out.line(format!("// {comment}"));
    out.blank();
}

/// Run one complete generation over `entities` and return the module text.
pub fn render<I>(options: GeneratorOptions, entities: I) -> String
where
    I: IntoIterator<Item = Entity>,
{
    run(options, entities).render()
}

/// Run one complete generation over `entities` and write the module to `sink`.
pub fn generate<I, W>(options: GeneratorOptions, entities: I, sink: W) -> Result<CommandRecord>
where
    I: IntoIterator<Item = Entity>,
    W: Write,
{
    let generator = run(options, entities);
    generator.write_to(sink)?;
    Ok(generator.record)
}

fn run<I>(options: GeneratorOptions, entities: I) -> Generator
where
    I: IntoIterator<Item = Entity>,
{
    let mut generator = Generator::new(options);
    generator.begin();
    for entity in entities {
        generator.entity(entity);
    }
    generator.end();
    generator
}
