//! The encode engine: the mirror walk of [`crate::decode`].
//!
//! Every constructed element needs its content length before its header,
//! so the content of each one is encoded once into a scratch buffer and
//! then appended behind the header.

use katagami::encoder::Encoder;
use katagami_asn1::{Primitive, Type};
use katagami_der::{self as der, Length, Rules, Tag};

use crate::Codec;
use crate::adb;
use crate::error::{Error, Result};
use crate::item::{Flags, Item, Kind, Tagging, Template};
use crate::value::{Node, Slot, Value};

impl Codec<'_> {
    /// Encodes `value` as `item`. `tag` replaces the item's own tag.
    pub fn encode(&self, value: &Value<'_>, item: &Item, tag: Option<Tag>) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_item(value, item, tag, &mut out, 0)?;
        Ok(out)
    }

    /// Appends the encoding of `value` to `out` and returns the octets
    /// written. On failure `out` is left as it was.
    pub fn encode_into(
        &self,
        value: &Value<'_>,
        item: &Item,
        tag: Option<Tag>,
        out: &mut Vec<u8>,
    ) -> Result<usize> {
        let start = out.len();
        match self.encode_item(value, item, tag, out, 0) {
            Ok(()) => Ok(out.len() - start),
            Err(e) => {
                out.truncate(start);
                Err(e)
            }
        }
    }

    /// Number of octets [`Codec::encode`] would produce.
    pub fn encoded_len(&self, value: &Value<'_>, item: &Item, tag: Option<Tag>) -> Result<usize> {
        Ok(self.encode(value, item, tag)?.len())
    }

    fn encode_item(
        &self,
        value: &Value<'_>,
        item: &Item,
        tag: Option<Tag>,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(Error::NestingTooDeep(self.config.max_depth));
        }
        tracing::trace!("encode {} at depth {depth}", item.name);

        if let Some(bytes) = value.enc.restore() {
            if cache_matches(bytes, item, tag) {
                tracing::debug!("{}: replaying {} cached octets", item.name, bytes.len());
                out.extend_from_slice(bytes);
                return Ok(());
            }
            tracing::debug!("{}: cached encoding carries another tag", item.name);
        }

        match (&value.node, item.kind) {
            (Node::Primitive(Primitive::Any(any)), Kind::Primitive(Type::Any)) => {
                if tag.is_some() {
                    return Err(Error::InvalidDescriptor(item.name));
                }
                der::write_header(out, any.tag, any.constructed, Length::Definite(any.contents.len()));
                out.extend_from_slice(&any.contents);
                Ok(())
            }
            (Node::Primitive(p), Kind::Primitive(ty)) if p.ty() == ty => {
                put_primitive(p, tag.or(ty.tag()), item, out)
            }
            (Node::Primitive(p), Kind::MString(mask)) if mask.contains(p.ty()) => {
                if tag.is_some() {
                    return Err(Error::InvalidDescriptor(item.name));
                }
                put_primitive(p, p.ty().tag(), item, out)
            }
            (Node::Object(oid), Kind::Primitive(Type::ObjectIdentifier)) => {
                let content = oid.to_content().map_err(|source| Error::Content {
                    item: item.name,
                    source,
                })?;
                let tag = tag.or(Type::ObjectIdentifier.tag()).ok_or(Error::InvalidDescriptor(item.name))?;
                der::write_header(out, tag, false, Length::Definite(content.len()));
                out.extend_from_slice(&content);
                Ok(())
            }
            (Node::Fields(slots), Kind::Sequence(fields)) if slots.len() == fields.len() => {
                let mut content = Vec::new();
                self.encode_fields(slots, fields, item, &mut content, depth)?;
                put_constructed(tag.unwrap_or(Tag::SEQUENCE), &content, out)
            }
            (Node::Choice(Some(selected)), Kind::Choice(alternatives)) => {
                if tag.is_some() {
                    return Err(Error::InvalidDescriptor(item.name));
                }
                let alternative = alternatives
                    .get(selected.index)
                    .ok_or(Error::ShapeMismatch(item.name))?;
                self.encode_template(&selected.slot, alternative, &[], item, out, depth + 1)
            }
            (Node::Choice(None), Kind::Choice(_)) => Err(Error::MissingRequiredField {
                item: item.name,
                field: "<alternative>",
            }),
            (Node::Fields(slots), Kind::Wrapper(tt)) if slots.len() == 1 => {
                let retagged;
                let tt = match tag {
                    Some(tag) => {
                        retagged = tt.retagged(tag);
                        &retagged
                    }
                    None => tt,
                };
                self.encode_template(&slots[0], tt, &[], item, out, depth + 1)
            }
            _ => Err(Error::ShapeMismatch(item.name)),
        }
    }

    fn encode_fields(
        &self,
        slots: &[Slot<'_>],
        fields: &[Template],
        item: &Item,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        for (slot, tt) in slots.iter().zip(fields) {
            self.encode_template(slot, tt, slots, item, out, depth + 1)?;
        }
        Ok(())
    }

    /// Encodes one field. Absent optional fields and fields equal to their
    /// DEFAULT produce nothing.
    fn encode_template(
        &self,
        slot: &Slot<'_>,
        tt: &Template,
        siblings: &[Slot<'_>],
        parent: &Item,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        let Some(resolved) = adb::resolve(siblings, tt, !slot.is_absent())? else {
            return Ok(());
        };
        match slot {
            Slot::Absent if tt.is_optional() || resolved.is_optional() => return Ok(()),
            Slot::Absent => {
                return Err(Error::MissingRequiredField {
                    item: parent.name,
                    field: tt.name,
                });
            }
            Slot::One(value) if is_default(value, tt, resolved) => {
                tracing::trace!("{}: default value omitted", tt.name);
                return Ok(());
            }
            _ => {}
        }

        let Some(item) = resolved.item() else {
            return Err(Error::InvalidDescriptor(resolved.name));
        };
        match resolved.tagging {
            Tagging::Explicit(tag) => {
                let mut content = Vec::new();
                self.encode_untagged(slot, resolved, item, None, &mut content, depth)?;
                put_constructed(tag, &content, out)
            }
            Tagging::Implicit(tag) => self.encode_untagged(slot, resolved, item, Some(tag), out, depth),
            Tagging::None => self.encode_untagged(slot, resolved, item, None, out, depth),
        }
    }

    fn encode_untagged(
        &self,
        slot: &Slot<'_>,
        tt: &Template,
        item: &Item,
        tag: Option<Tag>,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        if !tt.is_repeated() {
            let Slot::One(value) = slot else {
                return Err(Error::ShapeMismatch(tt.name));
            };
            return self.encode_item(value, item, tag, out, depth);
        }

        let Slot::Many(values) = slot else {
            return Err(Error::ShapeMismatch(tt.name));
        };
        let set_of = tt.flags.contains(Flags::SET_OF);
        let mut elements = values
            .iter()
            .map(|value| {
                let mut element = Vec::new();
                self.encode_item(value, item, None, &mut element, depth + 1)?;
                Ok(element)
            })
            .collect::<Result<Vec<Vec<u8>>>>()?;
        // DER orders SET OF elements by their encodings.
        if set_of {
            elements.sort();
        }

        let natural = if set_of { Tag::SET } else { Tag::SEQUENCE };
        put_constructed(tag.unwrap_or(natural), &elements.concat(), out)
    }
}

fn put_primitive(value: &Primitive, tag: Option<Tag>, item: &Item, out: &mut Vec<u8>) -> Result<()> {
    let tag = tag.ok_or(Error::InvalidDescriptor(item.name))?;
    let content = value.encode().map_err(|source| Error::Content {
        item: item.name,
        source,
    })?;
    der::write_header(out, tag, false, Length::Definite(content.len()));
    out.extend_from_slice(&content);
    Ok(())
}

fn put_constructed(tag: Tag, content: &[u8], out: &mut Vec<u8>) -> Result<()> {
    let length = Length::Definite(content.len());
    let total = der::header_len(tag, length) + content.len();
    out.try_reserve(total)
        .map_err(|_| Error::AllocationFailure(total))?;
    der::write_header(out, tag, true, length);
    out.extend_from_slice(content);
    Ok(())
}

fn is_default(value: &Value<'_>, tt: &Template, resolved: &Template) -> bool {
    match (resolved.default.or(tt.default), value.as_primitive()) {
        (Some(default), Some(primitive)) => *primitive == default(),
        _ => false,
    }
}

/// A cache is only replayed under the tag the encoder is about to emit.
fn cache_matches(bytes: &[u8], item: &Item, tag: Option<Tag>) -> bool {
    let Ok((_, header)) = der::parse_header(bytes, Rules::Ber) else {
        return false;
    };
    match tag.or(item.natural_tag()) {
        Some(expected) => header.tag == expected,
        None => item.accepts(header.tag),
    }
}
