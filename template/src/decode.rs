//! The decode engine: walks a descriptor depth-first in step with the input.

use katagami::decoder::Decoder;
use katagami_asn1::{Any, Content, Primitive, StringMask, Type};
use katagami_der::{self as der, END_OF_CONTENTS, Header, Length, Tag};

use crate::Codec;
use crate::adb;
use crate::error::{Error, Result};
use crate::item::{Aux, Flags, Item, Kind, Tagging, Template};
use crate::value::{Node, Selected, Slot, Value};

/// Content of one constructed element, definite or indefinite.
struct Body<'a> {
    name: &'static str,
    cursor: &'a [u8],
    /// Input following the element; `None` while an end-of-contents marker
    /// is still expected.
    after: Option<&'a [u8]>,
}

impl<'a> Body<'a> {
    fn open(name: &'static str, rest: &'a [u8], header: &Header) -> Result<Self> {
        if !header.constructed {
            return Err(Error::UnexpectedForm {
                item: name,
                constructed: false,
            });
        }
        Ok(match header.length {
            Length::Definite(len) => {
                let (content, after) = rest.split_at(len);
                Body {
                    name,
                    cursor: content,
                    after: Some(after),
                }
            }
            Length::Indefinite => Body {
                name,
                cursor: rest,
                after: None,
            },
        })
    }

    fn at_end(&self) -> bool {
        match self.after {
            Some(_) => self.cursor.is_empty(),
            None => der::is_end_of_contents(self.cursor),
        }
    }

    /// Checks the content was used up and returns the input after the element.
    fn close(self) -> Result<&'a [u8]> {
        match self.after {
            Some(after) if self.cursor.is_empty() => Ok(after),
            Some(_) => Err(Error::LengthMismatch(self.name)),
            None if der::is_end_of_contents(self.cursor) => Ok(&self.cursor[END_OF_CONTENTS.len()..]),
            None if self.cursor.len() < END_OF_CONTENTS.len() => Err(Error::Truncated),
            None => Err(Error::LengthMismatch(self.name)),
        }
    }
}

impl Codec<'_> {
    /// Decodes one `item` from the front of `input`.
    ///
    /// Returns the value and the number of octets it took; anything after
    /// that is left alone. `tag` replaces the item's own tag, as implicit
    /// tagging would.
    pub fn decode_prefix<'a>(
        &self,
        item: &Item,
        input: &'a [u8],
        tag: Option<Tag>,
    ) -> Result<(Value<'a>, usize)> {
        let (value, rest) = self.decode_item(input, item, tag, 0)?;
        Ok((value, input.len() - rest.len()))
    }

    /// Decodes `input` as exactly one `item`. Octets left over are an error
    /// unless the configuration allows them.
    pub fn decode<'a>(&self, item: &Item, input: &'a [u8]) -> Result<Value<'a>> {
        let (value, consumed) = self.decode_prefix(item, input, None)?;
        let trailing = input.len() - consumed;
        if trailing > 0 && !self.config.allow_trailing {
            return Err(Error::TrailingData(trailing));
        }
        Ok(value)
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(Error::NestingTooDeep(self.config.max_depth));
        }
        Ok(())
    }

    fn decode_item<'a>(
        &self,
        input: &'a [u8],
        item: &Item,
        tag: Option<Tag>,
        depth: usize,
    ) -> Result<(Value<'a>, &'a [u8])> {
        self.check_depth(depth)?;
        tracing::trace!("decode {} at depth {depth}", item.name);

        let (node, rest) = match item.kind {
            Kind::Primitive(Type::Any) => self.decode_any(input, item, tag, depth)?,
            Kind::Primitive(ty) => {
                let expected = tag.or(ty.tag()).ok_or(Error::InvalidDescriptor(item.name))?;
                let (rest, header) = self.expect_header(input, item.name, expected)?;
                self.primitive_content(rest, &header, item, ty)?
            }
            Kind::MString(mask) => self.decode_mstring(input, item, mask, tag)?,
            Kind::Sequence(fields) => self.decode_sequence(input, item, fields, tag, depth)?,
            Kind::Choice(alternatives) => self.decode_choice(input, item, alternatives, tag, depth)?,
            Kind::Wrapper(tt) => {
                let retagged;
                let tt = match tag {
                    Some(tag) => {
                        retagged = tt.retagged(tag);
                        &retagged
                    }
                    None => tt,
                };
                let (slot, rest) = self.decode_template(input, tt, depth + 1)?;
                (Node::Fields(vec![slot]), rest)
            }
        };

        let mut value = Value::new(node);
        if depth == 0 || item.aux.contains(Aux::CACHE_ENCODING) {
            self.save_encoding(&mut value, &input[..input.len() - rest.len()], item);
        }
        Ok((value, rest))
    }

    fn save_encoding<'a>(&self, value: &mut Value<'a>, span: &'a [u8], item: &Item) {
        // The end-of-contents marker is not part of a node, so an
        // indefinite-length span cannot be replayed on its own.
        match der::parse_header(span, self.config.rules) {
            Ok((_, header)) if header.length != Length::Indefinite => {
                tracing::debug!("{}: caching {} octets", item.name, span.len());
                value.enc.save(span, self.config.alias_only);
            }
            _ => tracing::debug!("{}: indefinite-length encoding is not cached", item.name),
        }
    }

    fn expect_header<'a>(
        &self,
        input: &'a [u8],
        name: &'static str,
        expected: Tag,
    ) -> Result<(&'a [u8], Header)> {
        let (rest, header) = der::parse_header(input, self.config.rules)?;
        if header.tag != expected {
            return Err(Error::UnexpectedTag {
                item: name,
                found: header.tag,
            });
        }
        Ok((rest, header))
    }

    fn primitive_content<'a>(
        &self,
        rest: &'a [u8],
        header: &Header,
        item: &Item,
        ty: Type,
    ) -> Result<(Node<'a>, &'a [u8])> {
        let (false, Length::Definite(len)) = (header.constructed, header.length) else {
            return Err(Error::UnexpectedForm {
                item: item.name,
                constructed: true,
            });
        };
        let (bytes, rest) = rest.split_at(len);
        let value: Primitive = Content { ty, bytes }
            .decode()
            .map_err(|source| Error::Content {
                item: item.name,
                source,
            })?;
        let node = match value {
            Primitive::ObjectIdentifier(oid) => Node::Object(self.objects.intern(oid)),
            value => Node::Primitive(value),
        };
        Ok((node, rest))
    }

    fn decode_mstring<'a>(
        &self,
        input: &'a [u8],
        item: &Item,
        mask: StringMask,
        tag: Option<Tag>,
    ) -> Result<(Node<'a>, &'a [u8])> {
        if tag.is_some() {
            // The subtype is only known from the tag.
            return Err(Error::InvalidDescriptor(item.name));
        }
        let (rest, header) = der::parse_header(input, self.config.rules)?;
        let ty = Type::from_tag(header.tag)
            .filter(|ty| mask.contains(*ty))
            .ok_or(Error::UnexpectedTag {
                item: item.name,
                found: header.tag,
            })?;
        self.primitive_content(rest, &header, item, ty)
    }

    fn decode_any<'a>(
        &self,
        input: &'a [u8],
        item: &Item,
        tag: Option<Tag>,
        depth: usize,
    ) -> Result<(Node<'a>, &'a [u8])> {
        if tag.is_some() {
            return Err(Error::InvalidDescriptor(item.name));
        }
        let budget = self.config.max_depth.saturating_sub(depth);
        let (element, rest) = der::skip_element(input, self.config.rules, budget)?;
        let (content, header) = der::parse_header(element, self.config.rules)?;
        let contents = match header.length {
            Length::Definite(len) => &content[..len],
            Length::Indefinite => &content[..content.len() - END_OF_CONTENTS.len()],
        };
        let any = Any {
            tag: header.tag,
            constructed: header.constructed,
            contents: contents.to_vec(),
        };
        Ok((Node::Primitive(Primitive::Any(any)), rest))
    }

    fn decode_sequence<'a>(
        &self,
        input: &'a [u8],
        item: &Item,
        fields: &[Template],
        tag: Option<Tag>,
        depth: usize,
    ) -> Result<(Node<'a>, &'a [u8])> {
        let (rest, header) = self.expect_header(input, item.name, tag.unwrap_or(Tag::SEQUENCE))?;
        let mut body = Body::open(item.name, rest, &header)?;

        let mut slots: Vec<Slot<'a>> = Vec::with_capacity(fields.len());
        for (i, tt) in fields.iter().enumerate() {
            let next = fields.get(i + 1);
            let slot = self.decode_field(&mut body, item, &slots, tt, next, depth)?;
            slots.push(slot);
        }
        Ok((Node::Fields(slots), body.close()?))
    }

    /// Decodes one SEQUENCE field, deciding first whether it is present.
    fn decode_field<'a>(
        &self,
        body: &mut Body<'a>,
        item: &Item,
        siblings: &[Slot<'a>],
        tt: &Template,
        next: Option<&Template>,
        depth: usize,
    ) -> Result<Slot<'a>> {
        let Some(resolved) = adb::resolve(siblings, tt, self.config.strict_adb)? else {
            self.skip_unresolved(body, tt, next, depth)?;
            return Ok(Slot::Absent);
        };
        let last = next.is_none();

        let optional = tt.is_optional() || resolved.is_optional();
        if body.at_end() {
            if optional {
                return Ok(default_slot(tt, resolved));
            }
            return Err(Error::MissingRequiredField {
                item: item.name,
                field: tt.name,
            });
        }

        // The last field is decoded whenever content remains, so a stray
        // element there is reported instead of silently dropped.
        if optional && !last {
            let (_, header) = der::parse_header(body.cursor, self.config.rules)?;
            if !resolved.accepts(header.tag) {
                tracing::trace!("{}: absent", tt.name);
                return Ok(default_slot(tt, resolved));
            }
        }

        let (slot, rest) = self.decode_template(body.cursor, resolved, depth + 1)?;
        body.cursor = rest;
        Ok(slot)
    }

    /// Steps over the element of a field whose type is unknown. An optional
    /// field is taken as absent when the next element belongs to the field
    /// after it.
    fn skip_unresolved(
        &self,
        body: &mut Body<'_>,
        tt: &Template,
        next: Option<&Template>,
        depth: usize,
    ) -> Result<()> {
        if body.at_end() {
            return Ok(());
        }
        if let Some(next) = next.filter(|_| tt.is_optional()) {
            let (_, header) = der::parse_header(body.cursor, self.config.rules)?;
            if next.accepts(header.tag) {
                tracing::trace!("{}: absent, {} follows", tt.name, next.name);
                return Ok(());
            }
        }
        let budget = self.config.max_depth.saturating_sub(depth);
        let (skipped, rest) = der::skip_element(body.cursor, self.config.rules, budget)?;
        tracing::debug!("{}: skipped {} octets of unknown type", tt.name, skipped.len());
        body.cursor = rest;
        Ok(())
    }

    fn decode_choice<'a>(
        &self,
        input: &'a [u8],
        item: &Item,
        alternatives: &[Template],
        tag: Option<Tag>,
        depth: usize,
    ) -> Result<(Node<'a>, &'a [u8])> {
        if tag.is_some() {
            return Err(Error::InvalidDescriptor(item.name));
        }
        let (_, header) = der::parse_header(input, self.config.rules)?;
        let (index, alternative) = alternatives
            .iter()
            .enumerate()
            .find(|(_, alt)| alt.accepts(header.tag))
            .ok_or(Error::UnexpectedTag {
                item: item.name,
                found: header.tag,
            })?;
        tracing::trace!("{}: selected {}", item.name, alternative.name);

        let (slot, rest) = self.decode_template(input, alternative, depth + 1)?;
        let selected = Selected { index, slot };
        Ok((Node::Choice(Some(Box::new(selected))), rest))
    }

    /// Decodes a concrete template, unwrapping an explicit tag if it has one.
    fn decode_template<'a>(
        &self,
        input: &'a [u8],
        tt: &Template,
        depth: usize,
    ) -> Result<(Slot<'a>, &'a [u8])> {
        self.check_depth(depth)?;
        let Some(item) = tt.item() else {
            return Err(Error::InvalidDescriptor(tt.name));
        };
        match tt.tagging {
            Tagging::Explicit(tag) => {
                let (rest, header) = self.expect_header(input, tt.name, tag)?;
                let mut body = Body::open(tt.name, rest, &header)?;
                let (slot, cursor) = self.decode_untagged(body.cursor, tt, item, None, depth)?;
                body.cursor = cursor;
                Ok((slot, body.close()?))
            }
            Tagging::Implicit(tag) => self.decode_untagged(input, tt, item, Some(tag), depth),
            Tagging::None => self.decode_untagged(input, tt, item, None, depth),
        }
    }

    fn decode_untagged<'a>(
        &self,
        input: &'a [u8],
        tt: &Template,
        item: &Item,
        tag: Option<Tag>,
        depth: usize,
    ) -> Result<(Slot<'a>, &'a [u8])> {
        if !tt.is_repeated() {
            let (value, rest) = self.decode_item(input, item, tag, depth)?;
            return Ok((Slot::One(value), rest));
        }

        let natural = if tt.flags.contains(Flags::SET_OF) {
            Tag::SET
        } else {
            Tag::SEQUENCE
        };
        let (rest, header) = self.expect_header(input, tt.name, tag.unwrap_or(natural))?;
        let mut body = Body::open(tt.name, rest, &header)?;
        let mut values = Vec::new();
        while !body.at_end() {
            let (value, rest) = self.decode_item(body.cursor, item, None, depth + 1)?;
            values.push(value);
            body.cursor = rest;
        }
        Ok((Slot::Many(values), body.close()?))
    }
}

fn default_slot(tt: &Template, resolved: &Template) -> Slot<'static> {
    match resolved.default.or(tt.default) {
        Some(default) => Slot::One(Value::primitive(default())),
        None => Slot::Absent,
    }
}
