//! Registry elements to parsed entities.

use tracing::{debug, trace};
use vkdgen_ir::{
    BasicType, Command, EnumConstant, EnumGroup, EnumMember, Entity, Field, FuncPointer, Handle,
    HandleKind, RawType, Struct, Token, TokenKind,
};

use crate::{
    error::{Result, SourceContext},
    select::{Index, Requirements, api_matches},
    xml::{Element, Node},
};

/// Base value of enumerants contributed by extensions.
const EXT_ENUM_BASE: i64 = 1_000_000_000;
/// Enumerant range reserved for each extension number.
const EXT_ENUM_BLOCK: i64 = 1000;

/// `<type name="…">` or `<type>…<name>…</name></type>`.
pub(crate) fn type_name(element: &Element) -> Option<&str> {
    element
        .attr("name")
        .or_else(|| element.child("name").map(Element::first_text))
}

/// `<command name="…" alias="…"/>` or `<command><proto>…<name>…</name></proto>`.
pub(crate) fn command_name(element: &Element) -> Option<&str> {
    element.attr("name").or_else(|| {
        element
            .child("proto")?
            .child("name")
            .map(Element::first_text)
    })
}

/// Value of an `<enum>` in any of its encodings, as a literal.
pub(crate) fn enum_value(ctx: &SourceContext, item: &Element, ext_number: Option<i64>) -> Result<String> {
    let name = item.attr("name").unwrap_or_default();
    let invalid = |attr: &str| ctx.malformed_at(format!("invalid '{attr}' on enum '{name}'"), item.span);

    if let Some(value) = item.attr("value") {
        return Ok(value.to_string());
    }
    if let Some(bitpos) = item.attr("bitpos") {
        let bit: u32 = bitpos
            .parse()
            .ok()
            .filter(|bit| *bit < 64)
            .ok_or_else(|| invalid("bitpos"))?;
        return Ok((1u64 << bit).to_string());
    }
    if let Some(offset) = item.attr("offset") {
        let offset: i64 = offset.parse().map_err(|_| invalid("offset"))?;
        let ext_number = match item.attr("extnumber") {
            Some(number) => number.parse().map_err(|_| invalid("extnumber"))?,
            None => ext_number.ok_or_else(|| {
                ctx.malformed_at(
                    format!("enum '{name}' has an offset but no extension number"),
                    item.span,
                )
            })?,
        };
        let value = EXT_ENUM_BASE + (ext_number - 1) * EXT_ENUM_BLOCK + offset;
        return Ok(match item.attr("dir") {
            Some("-") => format!("-{value}"),
            _ => value.to_string(),
        });
    }
    if let Some(alias) = item.attr("alias") {
        return Ok(alias.to_string());
    }
    Err(ctx.malformed_at(format!("enum '{name}' has no value"), item.span))
}

/// Mixed content of a declaration as tokens. `<comment>` children are dropped.
pub(crate) fn tokens(element: &Element, api: &str) -> Vec<Token> {
    let mut out = Vec::new();
    for node in &element.children {
        match node {
            Node::Text(text) => out.push(Token::text(text.as_str())),
            Node::Element(child) if !api_matches(child, api) => {}
            Node::Element(child) => match child.name.as_str() {
                "type" => out.push(Token::ty(child.first_text())),
                "name" => out.push(Token::name(child.first_text())),
                "enum" => out.push(Token::new(TokenKind::Enum, child.first_text())),
                "comment" => {}
                _ => out.push(Token::text(child.text())),
            },
        }
    }
    out
}

/// Convert a `<types>` entry. Returns `None` for entries that declare
/// nothing the generator emits (platform types, empty enums).
pub(crate) fn type_entity(
    ctx: &SourceContext,
    index: &Index<'_>,
    required: &Requirements<'_>,
    element: &Element,
) -> Result<Option<Entity>> {
    let Some(name) = type_name(element) else {
        return Ok(None);
    };
    let Some(category) = element.attr("category") else {
        trace!(name, "type without category");
        return Ok(None);
    };
    if let Some(alias) = element.attr("alias") {
        return Ok(Some(Entity::BasicType(BasicType {
            name: name.to_string(),
            underlying: alias.to_string(),
        })));
    }

    let entity = match category {
        "basetype" | "bitmask" => match element.child("type") {
            Some(ty) => Entity::BasicType(BasicType {
                name: name.to_string(),
                underlying: ty.first_text().trim().to_string(),
            }),
            None => {
                debug!(name, "skipping opaque base type");
                return Ok(None);
            }
        },
        "handle" => {
            let macro_name = element.child("type").map_or("", Element::first_text).trim();
            let kind = HandleKind::from_macro(macro_name).ok_or_else(|| {
                ctx.malformed_at(
                    format!("handle '{name}' is declared with unknown macro '{macro_name}'"),
                    element.span,
                )
            })?;
            Entity::Handle(Handle {
                name: name.to_string(),
                kind,
            })
        }
        "funcpointer" => Entity::FuncPointer(func_pointer(ctx, index.api, name, element)?),
        "struct" | "union" => Entity::Struct(Struct {
            name: name.to_string(),
            is_union: category == "union",
            members: fields(ctx, index.api, element, "member")?,
        }),
        "enum" => {
            let Some(&block) = index.groups.get(name) else {
                debug!(name, "enum type has no value block");
                return Ok(None);
            };
            let group = enum_group(ctx, index.api, name, block, required.additions.get(name))?;
            if group.members.is_empty() {
                debug!(name, "skipping enum group without members");
                return Ok(None);
            }
            Entity::EnumGroup(group)
        }
        other => Entity::Unknown {
            raw_category: other.to_string(),
            name: name.to_string(),
        },
    };
    Ok(Some(entity))
}

fn enum_group(
    ctx: &SourceContext,
    api: &str,
    name: &str,
    block: &Element,
    additions: Option<&Vec<EnumMember>>,
) -> Result<EnumGroup> {
    let mut members: Vec<EnumMember> = Vec::new();
    for item in block.elements_named("enum").filter(|e| api_matches(e, api)) {
        let member = item
            .attr("name")
            .ok_or_else(|| ctx.malformed_at(format!("enum in '{name}' has no name"), item.span))?;
        members.push(EnumMember::new(member, enum_value(ctx, item, None)?));
    }
    for addition in additions.into_iter().flatten() {
        if !members.iter().any(|m| m.name == addition.name) {
            members.push(addition.clone());
        }
    }

    let bit_width = block
        .attr("bitwidth")
        .map(|width| {
            width.parse().map_err(|_| {
                ctx.malformed_at(format!("invalid bitwidth on '{name}'"), block.span)
            })
        })
        .transpose()?;

    Ok(EnumGroup {
        name: name.to_string(),
        is_bitmask: block.attr("type") == Some("bitmask"),
        bit_width,
        members,
    })
}

/// Accepts the classic mixed-text encoding and the `<proto>`/`<param>` one,
/// and always yields the classic `)(…);` tail.
fn func_pointer(ctx: &SourceContext, api: &str, name: &str, element: &Element) -> Result<FuncPointer> {
    if let Some(proto) = element.child("proto") {
        let head = tokens(proto, api);
        let head = head.split(Token::is_name).next().unwrap_or_default();
        let params: Vec<&Element> = element
            .elements_named("param")
            .filter(|p| api_matches(p, api))
            .collect();

        let mut tail = vec![Token::text(")(")];
        if params.is_empty() {
            tail.push(Token::text("void"));
        }
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                tail.push(Token::text(", "));
            }
            // the classic encoding spells parameter names as plain text
            tail.extend(tokens(param, api).into_iter().map(|token| match token.kind {
                TokenKind::Name => Token::text(token.text),
                _ => token,
            }));
        }
        tail.push(Token::text(");"));

        return Ok(FuncPointer {
            name: name.to_string(),
            return_type: return_type(head),
            params: RawType::new(tail),
        });
    }

    let tokens = tokens(element, api);
    let Some(at) = tokens.iter().position(Token::is_name) else {
        return Err(ctx.malformed_at(
            format!("function pointer '{name}' has no <name>"),
            element.span,
        ));
    };
    Ok(FuncPointer {
        name: name.to_string(),
        return_type: return_type(&tokens[..at]),
        params: RawType::new(tokens[at + 1..].to_vec()),
    })
}

/// `typedef const char* (VKAPI_PTR *` → `const char*`.
fn return_type(head: &[Token]) -> String {
    let text: String = head.iter().map(|t| t.text.as_str()).collect();
    let text = text.split('(').next().unwrap_or_default();
    text.split_whitespace()
        .filter(|word| *word != "typedef")
        .collect::<Vec<_>>()
        .join(" ")
}

fn fields(ctx: &SourceContext, api: &str, element: &Element, tag: &str) -> Result<Vec<Field>> {
    element
        .elements_named(tag)
        .filter(|e| api_matches(e, api))
        .map(|e| field(ctx, api, e))
        .collect()
}

fn field(ctx: &SourceContext, api: &str, element: &Element) -> Result<Field> {
    let name = element
        .child("name")
        .map(Element::first_text)
        .ok_or_else(|| ctx.malformed_at(format!("<{}> has no <name>", element.name), element.span))?;
    Ok(Field::new(RawType::new(tokens(element, api)), name.trim()))
}

pub(crate) fn constant(ctx: &SourceContext, element: &Element) -> Result<EnumConstant> {
    let name = element
        .attr("name")
        .ok_or_else(|| ctx.malformed_at("constant has no name", element.span))?;
    Ok(EnumConstant {
        name: name.to_string(),
        value: enum_value(ctx, element, None)?,
    })
}

/// Convert a `<command>`, following its alias to the defining prototype.
pub(crate) fn command(ctx: &SourceContext, index: &Index<'_>, element: &Element) -> Result<Command> {
    let name = command_name(element)
        .ok_or_else(|| ctx.malformed_at("command has no name", element.span))?;
    let definition = index.resolve_command(ctx, element)?;
    let proto = definition.child("proto").ok_or_else(|| {
        ctx.malformed_at(format!("command '{name}' has no <proto>"), definition.span)
    })?;
    let head: String = tokens(proto, index.api)
        .iter()
        .take_while(|t| !t.is_name())
        .map(|t| t.text.as_str())
        .collect();

    Ok(Command {
        name: name.to_string(),
        return_type: head.trim().to_string(),
        params: fields(ctx, index.api, definition, "param")?,
    })
}
