use std::io::{self, Write};

use vkdgen_codegen::{DispatchGroup, GeneratorOptions, generate, render};
use vkdgen_ir::{Command, EnumConstant, Entity, Field, RawType, Struct, Token};

fn field(ty: &str, name: &str) -> Field {
    Field::new(
        RawType::new(vec![Token::ty(ty), Token::text(" "), Token::name(name)]),
        name,
    )
}

fn section<'a>(text: &'a str, comment: &str) -> Vec<&'a str> {
    text.lines()
        .skip_while(|line| *line != comment)
        .skip(2)
        .take_while(|line| !line.starts_with("// "))
        .filter(|line| !line.is_empty())
        .collect()
}

#[test]
fn test_struct_members_are_aligned() {
    let text = render(
        GeneratorOptions::default(),
        [Entity::Struct(Struct {
            name: "Point".into(),
            is_union: false,
            members: vec![field("float", "x"), field("float", "y")],
        })],
    );
    assert_eq!(
        section(&text, "// Structures"),
        ["struct Point {", "    float x;", "    float y;", "}"]
    );
}

#[test]
fn test_custom_dispatchable_owner() {
    let options = GeneratorOptions {
        dispatchable_owners: vec!["DeviceHandle".into()],
        ..Default::default()
    };
    let mut bytes = Vec::new();
    let record = generate(
        options,
        [Entity::Command(Command {
            name: "GetThing".into(),
            return_type: "void".into(),
            params: vec![field("DeviceHandle", "dev")],
        })],
        &mut bytes,
    )
    .unwrap();

    assert_eq!(record.group_of("GetThing"), Some(DispatchGroup::Device));
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(
        section(&text, "// Commands"),
        [
            "extern(C) {",
            "    alias PFN_GetThing = void function (DeviceHandle dev);",
            "}",
        ]
    );
}

#[test]
fn test_unsigned_long_long_suffix() {
    let text = render(
        GeneratorOptions::default(),
        [Entity::EnumConstant(EnumConstant {
            name: "VK_WHOLE_SIZE".into(),
            value: "0ULL".into(),
        })],
    );
    assert_eq!(section(&text, "// Constants"), ["enum VK_WHOLE_SIZE = 0uL;"]);
}

#[test]
fn test_zero_parameter_command() {
    let text = render(
        GeneratorOptions::default(),
        [Entity::Command(Command {
            name: "vkNoArgs".into(),
            return_type: "void".into(),
            params: vec![],
        })],
    );
    let aliases: Vec<_> = text.lines().filter(|l| l.contains("PFN_vkNoArgs")).collect();
    assert_eq!(aliases, ["    alias PFN_vkNoArgs = void function ();"]);
}

#[test]
fn test_output_is_deterministic() {
    let entities = || {
        vec![
            Entity::Struct(Struct {
                name: "Point".into(),
                is_union: false,
                members: vec![field("float", "x"), field("float", "y")],
            }),
            Entity::Command(Command {
                name: "vkQueueWaitIdle".into(),
                return_type: "VkResult".into(),
                params: vec![field("VkQueue", "queue")],
            }),
        ]
    };
    let first = render(GeneratorOptions::default(), entities());
    let second = render(GeneratorOptions::default(), entities());
    assert_eq!(first, second);
}

#[test]
fn test_duplicate_command_keeps_first() {
    let command = |ret: &str| {
        Entity::Command(Command {
            name: "vkDeviceWaitIdle".into(),
            return_type: ret.into(),
            params: vec![field("VkDevice", "device")],
        })
    };
    let text = render(GeneratorOptions::default(), [command("VkResult"), command("void")]);
    let aliases: Vec<_> = text
        .lines()
        .filter(|l| l.contains("PFN_vkDeviceWaitIdle"))
        .collect();
    assert_eq!(
        aliases,
        ["    alias PFN_vkDeviceWaitIdle = VkResult function (VkDevice device);"]
    );
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_failure_is_reported() {
    let err = generate(GeneratorOptions::default(), [], BrokenPipe).unwrap_err();
    assert_eq!(err.to_string(), "failed to write generated bindings");
}
