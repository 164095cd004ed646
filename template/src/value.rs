//! The runtime value tree.
//!
//! A [`Value`] mirrors the shape of the [`Item`](crate::item::Item) it was
//! built for: a primitive payload, an ordered list of field slots, or the
//! active alternative of a CHOICE. Each node may carry an [`Encoding`] cache
//! of the bytes it was decoded from.
//!
//! The mutating accessors drop the cache of the node they are called on.
//! Reaching a nested node mutably means going through those accessors on
//! every ancestor, so no cache on the way can go stale.

use katagami_asn1::{ObjectIdentifier, Primitive};

use crate::cache::Encoding;
use crate::refcount::Shared;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value<'a> {
    pub(crate) node: Node<'a>,
    pub(crate) enc: Encoding<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
    Primitive(Primitive),
    /// An interned object identifier shared with the object table.
    Object(Shared<ObjectIdentifier>),
    /// SEQUENCE fields in declaration order, or the body of a wrapper item.
    Fields(Vec<Slot<'a>>),
    /// The active CHOICE alternative; `None` before anything was selected.
    Choice(Option<Box<Selected<'a>>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected<'a> {
    pub index: usize,
    pub slot: Slot<'a>,
}

/// Storage for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Slot<'a> {
    #[default]
    Absent,
    One(Value<'a>),
    /// SET OF / SEQUENCE OF elements.
    Many(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
    pub fn new(node: Node<'a>) -> Self {
        Value {
            node,
            enc: Encoding::empty(),
        }
    }

    /// A primitive value. Object identifiers become a fresh shared handle.
    pub fn primitive(value: Primitive) -> Self {
        match value {
            Primitive::ObjectIdentifier(oid) => Value::object(Shared::new(oid)),
            value => Value::new(Node::Primitive(value)),
        }
    }

    pub fn object(oid: Shared<ObjectIdentifier>) -> Self {
        Value::new(Node::Object(oid))
    }

    pub fn sequence(fields: Vec<Slot<'a>>) -> Self {
        Value::new(Node::Fields(fields))
    }

    pub fn choice(index: usize, slot: Slot<'a>) -> Self {
        Value::new(Node::Choice(Some(Box::new(Selected { index, slot }))))
    }

    pub fn node(&self) -> &Node<'a> {
        &self.node
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match &self.node {
            Node::Primitive(value) => Some(value),
            _ => None,
        }
    }

    pub fn primitive_mut(&mut self) -> Option<&mut Primitive> {
        self.enc.invalidate();
        match &mut self.node {
            Node::Primitive(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Shared<ObjectIdentifier>> {
        match &self.node {
            Node::Object(oid) => Some(oid),
            _ => None,
        }
    }

    /// The object identifier held by this node, interned or not.
    pub fn oid(&self) -> Option<&ObjectIdentifier> {
        match &self.node {
            Node::Object(oid) => Some(oid),
            Node::Primitive(Primitive::ObjectIdentifier(oid)) => Some(oid),
            _ => None,
        }
    }

    pub fn fields(&self) -> &[Slot<'a>] {
        match &self.node {
            Node::Fields(fields) => fields,
            _ => &[],
        }
    }

    pub fn field(&self, index: usize) -> Option<&Slot<'a>> {
        self.fields().get(index)
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut Slot<'a>> {
        self.enc.invalidate();
        match &mut self.node {
            Node::Fields(fields) => fields.get_mut(index),
            _ => None,
        }
    }

    /// Index and storage of the active CHOICE alternative.
    pub fn selected(&self) -> Option<(usize, &Slot<'a>)> {
        match &self.node {
            Node::Choice(Some(selected)) => Some((selected.index, &selected.slot)),
            _ => None,
        }
    }

    pub fn encoding(&self) -> &Encoding<'a> {
        &self.enc
    }

    /// Forgets the cached encoding of this node.
    pub fn invalidate(&mut self) {
        self.enc.invalidate();
    }

    /// Detaches the tree from the buffer it was decoded from.
    pub fn into_owned(self) -> Value<'static> {
        Value {
            node: self.node.into_owned(),
            enc: self.enc.into_owned(),
        }
    }
}

impl<'a> Node<'a> {
    fn into_owned(self) -> Node<'static> {
        match self {
            Node::Primitive(value) => Node::Primitive(value),
            Node::Object(oid) => Node::Object(oid),
            Node::Fields(fields) => Node::Fields(fields.into_iter().map(Slot::into_owned).collect()),
            Node::Choice(selected) => Node::Choice(selected.map(|s| {
                Box::new(Selected {
                    index: s.index,
                    slot: s.slot.into_owned(),
                })
            })),
        }
    }
}

impl<'a> Slot<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Slot::Absent)
    }

    /// The single value of a non-repeated field.
    pub fn value(&self) -> Option<&Value<'a>> {
        match self {
            Slot::One(value) => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut Value<'a>> {
        match self {
            Slot::One(value) => Some(value),
            _ => None,
        }
    }

    /// Every value held, whether the field repeats or not.
    pub fn values(&self) -> &[Value<'a>] {
        match self {
            Slot::Absent => &[],
            Slot::One(value) => std::slice::from_ref(value),
            Slot::Many(values) => values,
        }
    }

    pub fn into_owned(self) -> Slot<'static> {
        match self {
            Slot::Absent => Slot::Absent,
            Slot::One(value) => Slot::One(value.into_owned()),
            Slot::Many(values) => Slot::Many(values.into_iter().map(Value::into_owned).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use katagami_asn1::Integer;

    use super::*;

    #[test]
    fn test_mutation_invalidates_cache() {
        let input = [0x30, 0x03, 0x02, 0x01, 0x05];
        let mut value = Value::sequence(vec![Slot::One(Value::primitive(Primitive::Integer(
            Integer::from(5),
        )))]);
        value.enc.save(&input, true);
        assert!(value.encoding().is_cached());

        // Read access leaves the cache alone.
        assert!(value.field(0).is_some());
        assert!(value.encoding().is_cached());

        let slot = value.field_mut(0).unwrap();
        *slot.value_mut().unwrap().primitive_mut().unwrap() = Primitive::Integer(Integer::from(6));
        assert!(!value.encoding().is_cached());
    }

    #[test]
    fn test_into_owned() {
        let owned = {
            let input = vec![0x06, 0x03, 0x55, 0x04, 0x03];
            let oid = ObjectIdentifier::from_str("2.5.4.3").unwrap();
            let mut value = Value::primitive(Primitive::ObjectIdentifier(oid));
            value.enc.save(&input, true);
            value.into_owned()
        };
        assert!(!owned.encoding().is_alias());
        assert_eq!(Some(&[0x06, 0x03, 0x55, 0x04, 0x03][..]), owned.encoding().restore());
        assert_eq!("2.5.4.3", owned.oid().unwrap().to_string());
    }

    #[test]
    fn test_slot_values() {
        let one = Slot::One(Value::primitive(Primitive::Null));
        assert_eq!(1, one.values().len());
        assert!(Slot::Absent.values().is_empty());
        assert!(Slot::Absent.is_absent());
        assert!(Slot::Many(vec![]).value().is_none());
    }
}
