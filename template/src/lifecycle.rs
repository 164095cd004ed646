//! Building empty value trees and tearing them down.

use katagami_asn1::{ObjectIdentifier, Primitive, StringMask, Type};

use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::{Error, Result};
use crate::item::{Item, Kind, Target, Template};
use crate::refcount::Shared;
use crate::value::{Node, Slot, Value};

/// Preference order when an empty multi-string has to pick a subtype.
const MSTRING_PREFERENCE: [Type; 8] = [
    Type::Utf8String,
    Type::PrintableString,
    Type::Ia5String,
    Type::BmpString,
    Type::T61String,
    Type::VisibleString,
    Type::NumericString,
    Type::UniversalString,
];

/// A zero-initialised tree shaped like `item`.
///
/// Required fields are allocated recursively; OPTIONAL and ANY DEFINED BY
/// fields start absent, repeated fields empty, CHOICE nodes unselected and
/// DEFAULT fields hold their default. A descriptor whose required fields
/// recurse forever is rejected with [`Error::NestingTooDeep`].
pub fn allocate(item: &'static Item) -> Result<Value<'static>> {
    allocate_limited(item, DEFAULT_MAX_DEPTH)
}

pub(crate) fn allocate_limited(item: &'static Item, max_depth: usize) -> Result<Value<'static>> {
    allocate_at(item, 0, max_depth)
}

fn allocate_at(item: &'static Item, depth: usize, max_depth: usize) -> Result<Value<'static>> {
    if depth > max_depth {
        return Err(Error::NestingTooDeep(max_depth));
    }
    let node = match item.kind {
        Kind::Sequence(fields) => Node::Fields(
            fields
                .iter()
                .map(|tt| allocate_template(tt, depth + 1, max_depth))
                .collect::<Result<Vec<_>>>()?,
        ),
        Kind::Wrapper(tt) => Node::Fields(vec![allocate_template(tt, depth + 1, max_depth)?]),
        _ => empty_node(item),
    };
    Ok(Value::new(node))
}

fn allocate_template(tt: &'static Template, depth: usize, max_depth: usize) -> Result<Slot<'static>> {
    if let Some(default) = tt.default {
        return Ok(Slot::One(Value::primitive(default())));
    }
    if tt.is_repeated() {
        return Ok(Slot::Many(Vec::new()));
    }
    match tt.target {
        _ if tt.is_optional() => Ok(Slot::Absent),
        Target::Adb(_) => Ok(Slot::Absent),
        Target::Item(item) => Ok(Slot::One(allocate_at(item, depth, max_depth)?)),
    }
}

/// The inert form of a node: empty primitives, all fields absent, no
/// alternative selected.
pub(crate) fn empty_node(item: &Item) -> Node<'static> {
    match item.kind {
        Kind::Primitive(Type::ObjectIdentifier) => {
            Node::Object(Shared::new(ObjectIdentifier::default()))
        }
        Kind::Primitive(ty) => Node::Primitive(Primitive::empty(ty)),
        Kind::MString(mask) => Node::Primitive(Primitive::empty(preferred_string(mask))),
        Kind::Sequence(fields) => Node::Fields(fields.iter().map(|_| Slot::Absent).collect()),
        Kind::Wrapper(_) => Node::Fields(vec![Slot::Absent]),
        Kind::Choice(_) => Node::Choice(None),
    }
}

fn preferred_string(mask: StringMask) -> Type {
    MSTRING_PREFERENCE
        .into_iter()
        .find(|ty| mask.contains(*ty))
        .unwrap_or(Type::Utf8String)
}

/// Releases `value`, walking it alongside `item`.
///
/// Shared handles give up their ownership one by one; storage is freed only
/// by the last owner. Parts of a partially built tree that were never filled
/// in are absent and skipped, and parts that do not match the descriptor are
/// dropped without inspection.
pub fn free(value: Value<'_>, item: &Item) {
    tracing::trace!("free {}", item.name);
    release_node(value.node, item);
}

/// Releases everything `value` owns but keeps the node itself, reset to its
/// inert form, for callers that embed it in storage of their own.
pub fn clear(value: &mut Value<'_>, item: &Item) {
    tracing::trace!("clear {}", item.name);
    let node = std::mem::replace(&mut value.node, empty_node(item));
    release_node(node, item);
    value.enc.invalidate();
}

fn release_node(node: Node<'_>, item: &Item) {
    match (node, item.kind) {
        (Node::Object(oid), _) => {
            let name = oid.to_string();
            match oid.release() {
                Some(_) => tracing::debug!("{}: released last reference to {}", item.name, name),
                None => tracing::debug!("{}: dropped one reference to {}", item.name, name),
            }
        }
        (Node::Fields(fields), Kind::Sequence(_) | Kind::Wrapper(_)) => {
            for (slot, tt) in fields.into_iter().zip(item.templates()) {
                release_slot(slot, tt);
            }
        }
        (Node::Choice(Some(selected)), Kind::Choice(alternatives)) => {
            if let Some(tt) = alternatives.get(selected.index) {
                release_slot(selected.slot, tt);
            }
        }
        (Node::Primitive(_) | Node::Choice(None), _) => {}
        (_, _) => tracing::debug!("{}: value does not match descriptor, dropping", item.name),
    }
}

fn release_slot(slot: Slot<'_>, tt: &Template) {
    let Some(item) = tt.item() else {
        // The concrete type of an ANY DEFINED BY field is only known next
        // to its selector.
        return;
    };
    match slot {
        Slot::Absent => {}
        Slot::One(value) => release_node(value.node, item),
        Slot::Many(values) => {
            for value in values {
                release_node(value.node, item);
            }
        }
    }
}
