//! Field table: which attribute a criterion compares, where it lives, and
//! which operators it accepts.
//!
//! Every field resolves to a plain accessor function over one record shape.
//! Entity fields read a [`Product`] directly; event fields read an
//! [`EventRecord`] payload and return `None` for event kinds that do not
//! carry the attribute.

use crate::{ConfigurationError, Operator};
use carbontrace_domain::{Address, EventKind, EventRecord, Product};
use std::fmt;

/// Which leaf source supplies candidate records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Current product records
    EntitySnapshot,
    /// Raw-material-used and transformation events
    EventHistory,
}

impl Source {
    /// Get the source name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::EntitySnapshot => "entity snapshot",
            Source::EventHistory => "event history",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type category of a field, deciding which operators apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Orderable integer (ids, carbon footprint, lot)
    Numeric,
    /// Account address, equality only
    Identity,
    /// Free text, case-sensitive equality only
    Text,
    /// Boolean flag, equality only
    Boolean,
}

impl FieldKind {
    /// Operators valid for this kind
    pub fn operators(&self) -> &'static [Operator] {
        match self {
            FieldKind::Numeric => &Operator::ALL,
            FieldKind::Identity | FieldKind::Text | FieldKind::Boolean => &[Operator::Equal],
        }
    }

    /// Whether `operator` may be used with this kind
    pub fn allows(&self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }
}

/// A filterable attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Product id (entity)
    ProductId,
    /// Product name (entity)
    Name,
    /// Current owner (entity)
    OwnerAddress,
    /// Accumulated carbon footprint (entity)
    CarbonFootprint,
    /// Whether the product is finished (entity)
    IsEnded,
    /// Supplier of a used raw material (event)
    SupplierAddress,
    /// Transformer that used a material or transformed the product (event)
    TransformerAddress,
    /// Name of a used raw material (event)
    RawMaterialName,
    /// Lot of a used raw material (event)
    Lot,
    /// Carbon footprint contributed by a single event (event)
    EventCarbonFootprint,
}

/// Borrowed view of a record attribute, ready for comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Numeric attribute
    Integer(u64),
    /// Address attribute
    Address(&'a Address),
    /// Text attribute
    Text(&'a str),
    /// Boolean attribute
    Boolean(bool),
}

pub(crate) type EntityAccessor = fn(&Product) -> FieldValue<'_>;
pub(crate) type EventAccessor = fn(&EventRecord) -> Option<FieldValue<'_>>;

/// Accessor resolved from the field table
#[derive(Clone, Copy)]
pub(crate) enum Accessor {
    Entity(EntityAccessor),
    Event(EventAccessor),
}

impl Field {
    /// All fields, in prompt order
    pub const ALL: [Field; 10] = [
        Field::ProductId,
        Field::Name,
        Field::OwnerAddress,
        Field::CarbonFootprint,
        Field::IsEnded,
        Field::SupplierAddress,
        Field::TransformerAddress,
        Field::RawMaterialName,
        Field::Lot,
        Field::EventCarbonFootprint,
    ];

    /// Canonical field name
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ProductId => "productId",
            Field::Name => "name",
            Field::OwnerAddress => "ownerAddress",
            Field::CarbonFootprint => "carbonFootprint",
            Field::IsEnded => "isEnded",
            Field::SupplierAddress => "supplierAddress",
            Field::TransformerAddress => "transformerAddress",
            Field::RawMaterialName => "rawMaterialName",
            Field::Lot => "lot",
            Field::EventCarbonFootprint => "eventCarbonFootprint",
        }
    }

    /// Parse a field from its canonical name or a short label
    ///
    /// Case, `_`, `-` and spaces are ignored, so `carbon_footprint`,
    /// `CarbonFootprint` and `cf` all name the same field.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "productid" | "id" => Some(Field::ProductId),
            "name" => Some(Field::Name),
            "owneraddress" | "owner" => Some(Field::OwnerAddress),
            "carbonfootprint" | "cf" => Some(Field::CarbonFootprint),
            "isended" | "ended" => Some(Field::IsEnded),
            "supplieraddress" | "supplier" => Some(Field::SupplierAddress),
            "transformeraddress" | "transformer" => Some(Field::TransformerAddress),
            "rawmaterialname" | "rawmaterial" | "material" => Some(Field::RawMaterialName),
            "lot" => Some(Field::Lot),
            "eventcarbonfootprint" | "eventcf" => Some(Field::EventCarbonFootprint),
            _ => None,
        }
    }

    /// Type category of the field
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::ProductId | Field::CarbonFootprint | Field::Lot | Field::EventCarbonFootprint => {
                FieldKind::Numeric
            }
            Field::OwnerAddress | Field::SupplierAddress | Field::TransformerAddress => {
                FieldKind::Identity
            }
            Field::Name | Field::RawMaterialName => FieldKind::Text,
            Field::IsEnded => FieldKind::Boolean,
        }
    }

    /// Source the field is read from
    pub fn source(&self) -> Source {
        match self {
            Field::ProductId
            | Field::Name
            | Field::OwnerAddress
            | Field::CarbonFootprint
            | Field::IsEnded => Source::EntitySnapshot,
            Field::SupplierAddress
            | Field::TransformerAddress
            | Field::RawMaterialName
            | Field::Lot
            | Field::EventCarbonFootprint => Source::EventHistory,
        }
    }

    /// Event kinds carrying this field (empty for entity fields)
    pub fn event_kinds(&self) -> &'static [EventKind] {
        match self {
            Field::SupplierAddress | Field::RawMaterialName | Field::Lot => {
                &[EventKind::RawMaterialUsed]
            }
            Field::TransformerAddress | Field::EventCarbonFootprint => &EventKind::ALL,
            _ => &[],
        }
    }

    pub(crate) fn accessor(&self) -> Accessor {
        match self {
            Field::ProductId => Accessor::Entity(entity::product_id),
            Field::Name => Accessor::Entity(entity::name),
            Field::OwnerAddress => Accessor::Entity(entity::owner),
            Field::CarbonFootprint => Accessor::Entity(entity::carbon_footprint),
            Field::IsEnded => Accessor::Entity(entity::is_ended),
            Field::SupplierAddress => Accessor::Event(event::supplier),
            Field::TransformerAddress => Accessor::Event(event::transformer),
            Field::RawMaterialName => Accessor::Event(event::material_name),
            Field::Lot => Accessor::Event(event::lot),
            Field::EventCarbonFootprint => Accessor::Event(event::carbon_footprint),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Field {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConfigurationError::UnknownField(s.to_string()))
    }
}

mod entity {
    use super::FieldValue;
    use carbontrace_domain::Product;

    pub(super) fn product_id(p: &Product) -> FieldValue<'_> {
        FieldValue::Integer(p.product_id.value())
    }

    pub(super) fn name(p: &Product) -> FieldValue<'_> {
        FieldValue::Text(&p.name)
    }

    pub(super) fn owner(p: &Product) -> FieldValue<'_> {
        FieldValue::Address(&p.owner)
    }

    pub(super) fn carbon_footprint(p: &Product) -> FieldValue<'_> {
        FieldValue::Integer(p.carbon_footprint)
    }

    pub(super) fn is_ended(p: &Product) -> FieldValue<'_> {
        FieldValue::Boolean(p.is_ended)
    }
}

mod event {
    use super::FieldValue;
    use carbontrace_domain::EventRecord;

    pub(super) fn supplier(e: &EventRecord) -> Option<FieldValue<'_>> {
        match e {
            EventRecord::RawMaterialUsed(used) => Some(FieldValue::Address(&used.supplier)),
            EventRecord::Transformation(_) => None,
        }
    }

    pub(super) fn transformer(e: &EventRecord) -> Option<FieldValue<'_>> {
        match e {
            EventRecord::RawMaterialUsed(used) => Some(FieldValue::Address(&used.transformer)),
            EventRecord::Transformation(t) => Some(FieldValue::Address(&t.transformer)),
        }
    }

    pub(super) fn material_name(e: &EventRecord) -> Option<FieldValue<'_>> {
        match e {
            EventRecord::RawMaterialUsed(used) => Some(FieldValue::Text(&used.name)),
            EventRecord::Transformation(_) => None,
        }
    }

    pub(super) fn lot(e: &EventRecord) -> Option<FieldValue<'_>> {
        match e {
            EventRecord::RawMaterialUsed(used) => Some(FieldValue::Integer(used.lot)),
            EventRecord::Transformation(_) => None,
        }
    }

    pub(super) fn carbon_footprint(e: &EventRecord) -> Option<FieldValue<'_>> {
        match e {
            EventRecord::RawMaterialUsed(used) => Some(FieldValue::Integer(used.carbon_footprint)),
            EventRecord::Transformation(t) => Some(FieldValue::Integer(t.carbon_footprint)),
        }
    }
}
