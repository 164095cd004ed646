//! Field access driven by descriptors.
//!
//! Fields live in an indexed list whose order is the declaration order of
//! the item's templates, so a template's position doubles as its address.

use crate::error::{Error, Result};
use crate::item::{Item, Kind};
use crate::value::{Node, Selected, Slot, Value};

/// Position of the template called `name` within `item`.
pub fn field_index(item: &Item, name: &str) -> Option<usize> {
    item.templates().iter().position(|t| t.name == name)
}

/// The storage slot for field `index`.
pub fn field_slot<'v, 'a>(fields: &'v mut [Slot<'a>], index: usize) -> Result<&'v mut Slot<'a>> {
    let len = fields.len();
    fields.get_mut(index).ok_or_else(|| {
        tracing::trace!("field {index} out of range for {len} slots");
        Error::ShapeMismatch("field index")
    })
}

/// Looks a field of a SEQUENCE value up by name.
pub fn field<'v, 'a>(value: &'v Value<'a>, item: &Item, name: &str) -> Option<&'v Slot<'a>> {
    value.field(field_index(item, name)?)
}

/// Index of the active CHOICE alternative.
pub fn get_choice_selector(value: &Value<'_>) -> Option<usize> {
    value.selected().map(|(index, _)| index)
}

/// Makes alternative `index` the active one, holding `slot`. The previous
/// alternative is dropped first, and the node's cached encoding with it.
pub fn set_choice_selector<'a>(
    value: &mut Value<'a>,
    item: &Item,
    index: usize,
    slot: Slot<'a>,
) -> Result<()> {
    let Kind::Choice(alternatives) = item.kind else {
        return Err(Error::ShapeMismatch(item.name));
    };
    if index >= alternatives.len() {
        return Err(Error::ShapeMismatch(item.name));
    }
    let Node::Choice(selected) = &mut value.node else {
        return Err(Error::ShapeMismatch(item.name));
    };
    if let Some(previous) = selected.take() {
        tracing::debug!(
            "{}: replacing alternative {} with {}",
            item.name,
            alternatives[previous.index].name,
            alternatives[index].name
        );
    }
    *selected = Some(Box::new(Selected { index, slot }));
    value.enc.invalidate();
    Ok(())
}

#[cfg(test)]
mod tests {
    use katagami_asn1::{Integer, Primitive};
    use katagami_der::Tag;

    use super::*;
    use crate::item::Template;
    use crate::universal::{BOOLEAN, INTEGER};

    static ALTS: [Template; 2] = [
        Template::new("number", &INTEGER),
        Template::new("flag", &BOOLEAN).implicit(Tag::context(1)),
    ];
    static ALT: Item = Item::choice("Alt", &ALTS);

    #[test]
    fn test_set_choice_selector() {
        let mut value = Value::new(Node::Choice(None));
        assert_eq!(None, get_choice_selector(&value));

        let number = Slot::One(Value::primitive(Primitive::Integer(Integer::from(3))));
        set_choice_selector(&mut value, &ALT, 0, number).unwrap();
        assert_eq!(Some(0), get_choice_selector(&value));

        let flag = Slot::One(Value::primitive(Primitive::Boolean(true)));
        set_choice_selector(&mut value, &ALT, 1, flag.clone()).unwrap();
        let (index, slot) = value.selected().unwrap();
        assert_eq!(1, index);
        assert_eq!(&flag, slot);

        assert_eq!(
            Error::ShapeMismatch("Alt"),
            set_choice_selector(&mut value, &ALT, 2, Slot::Absent).unwrap_err()
        );
        assert_eq!(Some(1), get_choice_selector(&value));
    }

    #[test]
    fn test_field_slot() {
        let mut fields = vec![Slot::Absent, Slot::Many(vec![])];
        *field_slot(&mut fields, 0).unwrap() = Slot::One(Value::primitive(Primitive::Null));
        assert!(!fields[0].is_absent());
        assert!(field_slot(&mut fields, 2).is_err());
        assert_eq!(Some(1), field_index(&ALT, "flag"));
        assert_eq!(None, field_index(&ALT, "missing"));
    }
}
