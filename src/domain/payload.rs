use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use std::fmt;

/// Point of initiation: whether the code may be scanned repeatedly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitiationMethod {
    Static,
    Dynamic,
    /// A raw method code, emitted zero-padded to two digits.
    Code(String),
}

impl<'de> Deserialize<'de> for InitiationMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Scalar(text) = Scalar::deserialize(deserializer)?;
        Ok(match text.as_str() {
            "STATIC" => InitiationMethod::Static,
            "DYNAMIC" => InitiationMethod::Dynamic,
            _ => InitiationMethod::Code(text),
        })
    }
}

/// An ordered list of `(key, value)` pairs.
///
/// Emission follows insertion order exactly, so the order in which a caller
/// lists sub-fields is part of the input contract. Deserializing from a JSON
/// object keeps document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldList(Vec<(String, String)>);

impl FieldList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'de> Deserialize<'de> for FieldList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldListVisitor;

        impl<'de> Visitor<'de> for FieldListVisitor {
            type Value = FieldList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of string or number values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<FieldList, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = FieldList::new();
                while let Some((key, Scalar(value))) = map.next_entry::<String, Scalar>()? {
                    fields.push(key, value);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldListVisitor)
    }
}

/// Merchant account information.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    /// Selects the tag (00-99) the account template is emitted under.
    #[serde(alias = "operator", deserialize_with = "deserialize_number")]
    pub account_operator: u32,
    /// Account sub-fields. `guid` maps to sub-tag `00`, other keys are tags.
    #[serde(default)]
    pub info: FieldList,
}

impl Merchant {
    pub fn new(account_operator: u32, info: FieldList) -> Self {
        Self {
            account_operator,
            info,
        }
    }
}

/// One alternate-language rendering of the merchant name and city.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct LanguageEntry(pub FieldList);

impl LanguageEntry {
    pub fn new(language: impl Into<String>, name: impl Into<String>) -> Self {
        Self(FieldList::new().with("language", language).with("name", name))
    }

    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self(self.0.with(key, value))
    }
}

/// Additional data fields such as bill number or terminal label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct DataFields(pub FieldList);

impl DataFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self(self.0.with(key, value))
    }
}

/// Transaction currency as an ISO 4217 code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Currency {
    Numeric(u32),
    Alpha(String),
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Scalar(text) = Scalar::deserialize(deserializer)?;
        Ok(match text.parse::<u32>() {
            Ok(code) => Currency::Numeric(code),
            Err(_) => Currency::Alpha(text),
        })
    }
}

/// A monetary value, kept exactly as the caller wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money(String);

impl Money {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The value as a decimal number, or `None` if the text is not one.
    pub fn to_decimal(&self) -> Option<Decimal> {
        self.0.parse::<Decimal>().ok()
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Scalar::deserialize(deserializer).map(|Scalar(text)| Money(text))
    }
}

/// A single entry of the additional merchant information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdditionalField {
    Category(u32),
    Country(String),
    Name(String),
    City(String),
    Postal(String),
    LanguageTemplate(Vec<LanguageEntry>),
    Currency(Currency),
    Amount(Money),
    Tip(u32),
    FeeFixed(Money),
    FeePercentage(Money),
    Data(DataFields),
    /// A key with no assigned tag. Its value is discarded on input.
    Unrecognized(String),
}

impl AdditionalField {
    /// The input key this field is read from.
    pub fn key(&self) -> &str {
        match self {
            AdditionalField::Category(_) => "category",
            AdditionalField::Country(_) => "country",
            AdditionalField::Name(_) => "name",
            AdditionalField::City(_) => "city",
            AdditionalField::Postal(_) => "postal",
            AdditionalField::LanguageTemplate(_) => "languageTemplate",
            AdditionalField::Currency(_) => "currency",
            AdditionalField::Amount(_) => "amount",
            AdditionalField::Tip(_) => "tip",
            AdditionalField::FeeFixed(_) => "feeFixed",
            AdditionalField::FeePercentage(_) => "feePercentage",
            AdditionalField::Data(_) => "data",
            AdditionalField::Unrecognized(key) => key.as_str(),
        }
    }
}

/// Additional merchant information, emitted in the order it is listed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdditionalInfo(Vec<AdditionalField>);

impl AdditionalInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: AdditionalField) -> Self {
        self.push(field);
        self
    }

    pub fn push(&mut self, field: AdditionalField) {
        self.0.push(field);
    }

    pub fn fields(&self) -> &[AdditionalField] {
        &self.0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|field| field.key() == key)
    }
}

impl<'de> Deserialize<'de> for AdditionalInfo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AdditionalInfoVisitor;

        impl<'de> Visitor<'de> for AdditionalInfoVisitor {
            type Value = AdditionalInfo;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of additional merchant information")
            }

            fn visit_map<A>(self, mut map: A) -> Result<AdditionalInfo, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut info = AdditionalInfo::new();
                while let Some(key) = map.next_key::<String>()? {
                    let field = match key.as_str() {
                        "category" => AdditionalField::Category(map.next_value::<Number>()?.0),
                        "country" => AdditionalField::Country(map.next_value::<Scalar>()?.0),
                        "name" => AdditionalField::Name(map.next_value::<Scalar>()?.0),
                        "city" => AdditionalField::City(map.next_value::<Scalar>()?.0),
                        "postal" => AdditionalField::Postal(map.next_value::<Scalar>()?.0),
                        "languageTemplate" => AdditionalField::LanguageTemplate(map.next_value()?),
                        "currency" => AdditionalField::Currency(map.next_value()?),
                        "amount" => AdditionalField::Amount(map.next_value()?),
                        "tip" => AdditionalField::Tip(map.next_value::<Number>()?.0),
                        "feeFixed" => AdditionalField::FeeFixed(map.next_value()?),
                        "feePercentage" => AdditionalField::FeePercentage(map.next_value()?),
                        "data" => AdditionalField::Data(map.next_value()?),
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                            AdditionalField::Unrecognized(key)
                        }
                    };
                    info.push(field);
                }
                Ok(info)
            }
        }

        deserializer.deserialize_map(AdditionalInfoVisitor)
    }
}

/// The complete description of a merchant QR code.
///
/// `merchant` and `additional` are optional here so that their absence is
/// reported by the encoder as a missing required field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(default, alias = "init")]
    pub initiation_method: Option<InitiationMethod>,
    #[serde(default)]
    pub merchant: Option<Merchant>,
    #[serde(default)]
    pub additional: Option<AdditionalInfo>,
}

impl Payload {
    pub fn new(merchant: Merchant, additional: AdditionalInfo) -> Self {
        Self {
            initiation_method: None,
            merchant: Some(merchant),
            additional: Some(additional),
        }
    }

    pub fn with_initiation_method(mut self, method: InitiationMethod) -> Self {
        self.initiation_method = Some(method);
        self
    }
}

/// A string or number rendered as text.
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or a number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
                Ok(Scalar(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// A non-negative integer given either as a number or as a string of digits.
struct Number(u32);

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Scalar(text) = Scalar::deserialize(deserializer)?;
        text.trim()
            .parse::<u32>()
            .map(Number)
            .map_err(|_| {
                <D::Error as de::Error>::invalid_value(
                    de::Unexpected::Str(&text),
                    &"a non-negative integer",
                )
            })
    }
}

fn deserialize_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Number::deserialize(deserializer).map(|n| n.0)
}
