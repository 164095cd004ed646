//! Static type descriptors.
//!
//! An [`Item`] describes one type; aggregate kinds list their fields as
//! [`Template`]s. Descriptors are plain `static` data built with the `const`
//! constructors below and are never mutated, so any number of threads may
//! read them at once.
//!
//! ```
//! use katagami_template::item::{Item, Template};
//! use katagami_template::universal::{BOOLEAN, INTEGER};
//!
//! static POINT_FIELDS: [Template; 2] = [
//!     Template::new("x", &INTEGER),
//!     Template::new("visible", &BOOLEAN).optional(),
//! ];
//! static POINT: Item = Item::sequence("Point", &POINT_FIELDS);
//!
//! assert_eq!(2, POINT.templates().len());
//! ```

use katagami_asn1::{Primitive, StringMask, Type};
use katagami_der::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aux(u8);

impl Aux {
    pub const NONE: Aux = Aux(0);
    /// Keep the original encoding of nested occurrences, not only the root.
    pub const CACHE_ENCODING: Aux = Aux(1 << 0);

    pub const fn contains(self, other: Aux) -> bool {
        self.0 & other.0 == other.0
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Kind {
    Primitive(Type),
    /// One of several string types, chosen by the tag on the wire.
    MString(StringMask),
    Sequence(&'static [Template]),
    Choice(&'static [Template]),
    /// A type that is nothing but one template, such as a named SEQUENCE OF.
    Wrapper(&'static Template),
}

#[derive(Debug, Clone, Copy)]
pub struct Item {
    pub name: &'static str,
    pub kind: Kind,
    pub aux: Aux,
}

impl Item {
    pub const fn primitive(name: &'static str, ty: Type) -> Self {
        Item {
            name,
            kind: Kind::Primitive(ty),
            aux: Aux::NONE,
        }
    }

    pub const fn mstring(name: &'static str, mask: StringMask) -> Self {
        Item {
            name,
            kind: Kind::MString(mask),
            aux: Aux::NONE,
        }
    }

    pub const fn sequence(name: &'static str, fields: &'static [Template]) -> Self {
        Item {
            name,
            kind: Kind::Sequence(fields),
            aux: Aux::NONE,
        }
    }

    pub const fn choice(name: &'static str, alternatives: &'static [Template]) -> Self {
        Item {
            name,
            kind: Kind::Choice(alternatives),
            aux: Aux::NONE,
        }
    }

    pub const fn wrapper(name: &'static str, template: &'static Template) -> Self {
        Item {
            name,
            kind: Kind::Wrapper(template),
            aux: Aux::NONE,
        }
    }

    /// Marks the item so every decoded occurrence keeps its original bytes.
    pub const fn cached(mut self) -> Self {
        self.aux = Aux(self.aux.0 | Aux::CACHE_ENCODING.0);
        self
    }

    /// The fields of a SEQUENCE, the alternatives of a CHOICE or the single
    /// template of a wrapper.
    pub fn templates(&self) -> &'static [Template] {
        match self.kind {
            Kind::Sequence(templates) | Kind::Choice(templates) => templates,
            Kind::Wrapper(template) => std::slice::from_ref(template),
            Kind::Primitive(_) | Kind::MString(_) => &[],
        }
    }

    /// Tag the item carries on the wire when nothing overrides it. `None`
    /// for kinds whose tag depends on the value (ANY, CHOICE, multi-strings).
    pub fn natural_tag(&self) -> Option<Tag> {
        match self.kind {
            Kind::Primitive(ty) => ty.tag(),
            Kind::MString(_) | Kind::Choice(_) => None,
            Kind::Sequence(_) => Some(Tag::SEQUENCE),
            Kind::Wrapper(template) => template.outer_tag(),
        }
    }

    /// Whether an element with `tag` can start a value of this item.
    pub fn accepts(&self, tag: Tag) -> bool {
        match self.kind {
            Kind::Primitive(Type::Any) => true,
            Kind::Primitive(ty) => ty.tag() == Some(tag),
            Kind::MString(mask) => Type::from_tag(tag).is_some_and(|ty| mask.contains(ty)),
            Kind::Sequence(_) => tag == Tag::SEQUENCE,
            Kind::Choice(alternatives) => alternatives.iter().any(|alt| alt.accepts(tag)),
            Kind::Wrapper(template) => template.accepts(tag),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags(u8);

impl Flags {
    pub const NONE: Flags = Flags(0);
    pub const OPTIONAL: Flags = Flags(1 << 0);
    pub const SET_OF: Flags = Flags(1 << 1);
    pub const SEQUENCE_OF: Flags = Flags(1 << 2);

    pub const fn union(self, other: Flags) -> Flags {
        Flags(self.0 | other.0)
    }

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tagging {
    None,
    /// Replace the field's own tag.
    Implicit(Tag),
    /// Wrap the field in an extra constructed element with this tag.
    Explicit(Tag),
}

#[derive(Debug, Clone, Copy)]
pub enum Target {
    Item(&'static Item),
    /// The concrete type depends on a sibling field; see [`crate::adb`].
    Adb(&'static Adb),
}

/// One field of a SEQUENCE, one alternative of a CHOICE, or the body of a
/// wrapper item.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub name: &'static str,
    pub flags: Flags,
    pub tagging: Tagging,
    pub target: Target,
    /// Value assumed when the field is absent from the input.
    pub default: Option<fn() -> Primitive>,
}

impl Template {
    pub const fn new(name: &'static str, item: &'static Item) -> Self {
        Template {
            name,
            flags: Flags::NONE,
            tagging: Tagging::None,
            target: Target::Item(item),
            default: None,
        }
    }

    pub const fn adb(name: &'static str, adb: &'static Adb) -> Self {
        Template {
            name,
            flags: Flags::NONE,
            tagging: Tagging::None,
            target: Target::Adb(adb),
            default: None,
        }
    }

    pub const fn optional(mut self) -> Self {
        self.flags = self.flags.union(Flags::OPTIONAL);
        self
    }

    pub const fn set_of(mut self) -> Self {
        self.flags = self.flags.union(Flags::SET_OF);
        self
    }

    pub const fn sequence_of(mut self) -> Self {
        self.flags = self.flags.union(Flags::SEQUENCE_OF);
        self
    }

    pub const fn implicit(mut self, tag: Tag) -> Self {
        self.tagging = Tagging::Implicit(tag);
        self
    }

    pub const fn explicit(mut self, tag: Tag) -> Self {
        self.tagging = Tagging::Explicit(tag);
        self
    }

    pub const fn with_default(mut self, default: fn() -> Primitive) -> Self {
        self.default = Some(default);
        self
    }

    /// Absent is acceptable: either OPTIONAL or carrying a DEFAULT.
    pub fn is_optional(&self) -> bool {
        self.flags.contains(Flags::OPTIONAL) || self.default.is_some()
    }

    pub fn is_repeated(&self) -> bool {
        self.flags.contains(Flags::SET_OF) || self.flags.contains(Flags::SEQUENCE_OF)
    }

    /// The item of a concrete (non-ADB) template.
    pub fn item(&self) -> Option<&'static Item> {
        match self.target {
            Target::Item(item) => Some(item),
            Target::Adb(_) => None,
        }
    }

    /// The tag of the repetition wrapper or of the item itself, after any
    /// implicit override but before explicit wrapping.
    pub fn inner_tag(&self) -> Option<Tag> {
        match self.tagging {
            Tagging::Implicit(tag) => Some(tag),
            _ if self.flags.contains(Flags::SET_OF) => Some(Tag::SET),
            _ if self.flags.contains(Flags::SEQUENCE_OF) => Some(Tag::SEQUENCE),
            _ => self.item().and_then(Item::natural_tag),
        }
    }

    /// The first tag this template produces on the wire.
    pub fn outer_tag(&self) -> Option<Tag> {
        match self.tagging {
            Tagging::Explicit(tag) => Some(tag),
            _ => self.inner_tag(),
        }
    }

    /// Whether an element with `tag` can start this template.
    pub fn accepts(&self, tag: Tag) -> bool {
        match (self.outer_tag(), self.target) {
            (Some(expected), _) => expected == tag,
            (None, Target::Item(item)) => item.accepts(tag),
            (None, Target::Adb(_)) => true,
        }
    }

    /// The same template with its outermost tag replaced by `tag`.
    pub(crate) fn retagged(&self, tag: Tag) -> Template {
        let tagging = match self.tagging {
            Tagging::Explicit(_) => Tagging::Explicit(tag),
            _ => Tagging::Implicit(tag),
        };
        Template { tagging, ..*self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdbKey {
    Oid(&'static [u64]),
    Int(i64),
}

#[derive(Debug, Clone, Copy)]
pub struct AdbEntry {
    pub key: AdbKey,
    pub template: Template,
}

/// ANY DEFINED BY: the template used for a field is picked by the value of
/// an earlier sibling.
#[derive(Debug, Clone, Copy)]
pub struct Adb {
    /// Index of the selector field within the parent SEQUENCE.
    pub selector: usize,
    pub entries: &'static [AdbEntry],
    /// Used when the selector matches no entry.
    pub default: Option<&'static Template>,
    /// Used when the selector field itself is absent.
    pub null: Option<&'static Template>,
}

impl Adb {
    pub const fn new(selector: usize, entries: &'static [AdbEntry]) -> Self {
        Adb {
            selector,
            entries,
            default: None,
            null: None,
        }
    }

    pub const fn with_default(mut self, template: &'static Template) -> Self {
        self.default = Some(template);
        self
    }

    pub const fn with_null(mut self, template: &'static Template) -> Self {
        self.null = Some(template);
        self
    }
}
