use crate::application::templates;
use crate::config::EncoderConfig;
use crate::domain::payload::{
    AdditionalField, AdditionalInfo, Currency, InitiationMethod, Money, Payload,
};
use crate::domain::ports::ChecksumBox;
use crate::domain::tlv::{Segment, Tag, pad};
use crate::error::{QrError, Result};
use crate::infrastructure::crc16::Crc16Ccitt;
use tracing::{debug, warn};

/// Payload format indicator, always the first data object.
pub const PAYLOAD_FORMAT_INDICATOR: &str = "000201";

/// Additional fields every payload must carry.
const REQUIRED_ADDITIONAL: [(&str, &str); 5] = [
    ("category", "additional.category"),
    ("country", "additional.country"),
    ("name", "additional.name"),
    ("city", "additional.city"),
    ("currency", "additional.currency"),
];

/// Turns a [`Payload`] into the text carried by a merchant QR code.
///
/// The encoder holds only its configuration and an optional checksum
/// collaborator; it keeps no state between calls and can be shared freely
/// across threads.
pub struct PayloadEncoder {
    config: EncoderConfig,
    checksum: Option<ChecksumBox>,
}

impl Default for PayloadEncoder {
    fn default() -> Self {
        Self::new(EncoderConfig::default())
    }
}

impl PayloadEncoder {
    /// Creates an encoder. When `config.checksum` is set, a CRC-16 field is
    /// appended to every payload.
    pub fn new(config: EncoderConfig) -> Self {
        let checksum = config
            .checksum
            .then(|| Box::new(Crc16Ccitt::new()) as ChecksumBox);
        Self { config, checksum }
    }

    /// Replaces the checksum collaborator.
    pub fn with_checksum(mut self, checksum: ChecksumBox) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// Encodes `payload` in one pass.
    ///
    /// Data objects are emitted in this order: format indicator, point of
    /// initiation, merchant account template, then the additional fields in the
    /// order they are listed. Either the whole payload is returned or an error;
    /// partial output never escapes.
    pub fn encode(&self, payload: &Payload) -> Result<String> {
        let merchant = payload
            .merchant
            .as_ref()
            .ok_or(QrError::MissingRequiredField("merchant"))?;
        let additional = payload
            .additional
            .as_ref()
            .ok_or(QrError::MissingRequiredField("additional"))?;
        self.validate(additional)?;

        let mut out = String::from(PAYLOAD_FORMAT_INDICATOR);

        if let Some(code) = self.initiation_code(payload.initiation_method.as_ref())? {
            Segment::new(Tag::INITIATION_METHOD, code)?.write_to(&mut out);
        }

        out.push_str(&templates::merchant_account(merchant, &self.config)?);

        for field in additional.fields() {
            self.encode_field(field, &mut out)?;
        }

        if let Some(checksum) = &self.checksum {
            out.push_str(&checksum.tag().to_string());
            out.push_str("04");
            let value = checksum.checksum(&out);
            if value.chars().count() != 4 {
                return Err(QrError::InvalidFieldValue {
                    field: "checksum",
                    reason: format!("expected 4 characters, got {:?}", value),
                });
            }
            out.push_str(&value);
        }

        debug!(length = out.chars().count(), "encoded payload");
        Ok(out)
    }

    /// Checks required and mutually exclusive additional fields before anything
    /// is emitted.
    fn validate(&self, additional: &AdditionalInfo) -> Result<()> {
        for (key, name) in REQUIRED_ADDITIONAL {
            if !additional.contains(key) {
                return Err(QrError::MissingRequiredField(name));
            }
        }

        if self.config.is_strict()
            && additional.contains("feeFixed")
            && additional.contains("feePercentage")
        {
            return Err(QrError::InvalidFieldValue {
                field: "feeFixed",
                reason: "feeFixed and feePercentage are mutually exclusive".to_string(),
            });
        }

        Ok(())
    }

    fn initiation_code(&self, method: Option<&InitiationMethod>) -> Result<Option<String>> {
        match method {
            None if self.config.is_strict() => {
                Err(QrError::MissingRequiredField("initiationMethod"))
            }
            None => {
                warn!("no point of initiation method given, omitting tag 01");
                Ok(None)
            }
            Some(InitiationMethod::Static) => Ok(Some("11".to_string())),
            Some(InitiationMethod::Dynamic) => Ok(Some("12".to_string())),
            Some(InitiationMethod::Code(code)) => {
                let numeric = !code.is_empty()
                    && code.len() <= 2
                    && code.bytes().all(|b| b.is_ascii_digit());
                if !numeric {
                    if self.config.is_strict() {
                        return Err(QrError::InvalidInitiationMethod(code.clone()));
                    }
                    warn!(method = %code, "unrecognized initiation method, padding to two characters");
                }
                Ok(Some(pad(code, 2)))
            }
        }
    }

    fn encode_field(&self, field: &AdditionalField, out: &mut String) -> Result<()> {
        let strict = self.config.is_strict();
        match field {
            AdditionalField::Category(category) => {
                if strict && *category > 9999 {
                    return Err(out_of_range("category", *category, 4));
                }
                Segment::new(Tag::CATEGORY, pad(category, 4))?.write_to(out);
            }
            AdditionalField::Country(country) => {
                if strict && country.chars().count() != 2 {
                    return Err(QrError::InvalidFieldValue {
                        field: "country",
                        reason: format!("{:?} is not a two-letter country code", country),
                    });
                }
                Segment::new(Tag::COUNTRY, pad(country, 2))?.write_to(out);
            }
            AdditionalField::Name(name) => Segment::new(Tag::NAME, name.as_str())?.write_to(out),
            AdditionalField::City(city) => Segment::new(Tag::CITY, city.as_str())?.write_to(out),
            AdditionalField::Postal(postal) => {
                Segment::new(Tag::POSTAL, postal.as_str())?.write_to(out)
            }
            AdditionalField::LanguageTemplate(entries) => {
                out.push_str(&templates::language_template(entries, &self.config)?);
            }
            AdditionalField::Currency(Currency::Numeric(code)) => {
                if strict && *code > 999 {
                    return Err(out_of_range("currency", *code, 3));
                }
                Segment::new(Tag::CURRENCY, pad(code, 3))?.write_to(out);
            }
            AdditionalField::Currency(Currency::Alpha(code)) => {
                if strict {
                    return Err(QrError::UnsupportedCurrencyFormat(code.clone()));
                }
                warn!(currency = %code, "alphabetic currency codes are not supported, dropping tag 53");
            }
            AdditionalField::Amount(amount) => {
                Segment::new(Tag::AMOUNT, self.money("amount", amount)?)?.write_to(out);
            }
            AdditionalField::Tip(tip) => {
                if strict && *tip > 99 {
                    return Err(out_of_range("tip", *tip, 2));
                }
                Segment::new(Tag::TIP, pad(tip, 2))?.write_to(out);
            }
            AdditionalField::FeeFixed(fee) => {
                Segment::new(Tag::FEE_FIXED, self.money("feeFixed", fee)?)?.write_to(out);
            }
            AdditionalField::FeePercentage(fee) => {
                Segment::new(Tag::FEE_PERCENTAGE, self.money("feePercentage", fee)?)?
                    .write_to(out);
            }
            AdditionalField::Data(data) => {
                out.push_str(&templates::data_template(data, &self.config)?);
            }
            AdditionalField::Unrecognized(key) => {
                if strict {
                    return Err(QrError::UnknownField(key.clone()));
                }
                warn!(field = %key, "dropping unrecognized additional field");
            }
        }
        Ok(())
    }

    /// Money is emitted as written; strict mode only checks that it reads as a
    /// non-negative decimal.
    fn money<'a>(&self, field: &'static str, value: &'a Money) -> Result<&'a str> {
        if self.config.is_strict() {
            match value.to_decimal() {
                Some(number) if !number.is_sign_negative() => {}
                _ => {
                    return Err(QrError::InvalidFieldValue {
                        field,
                        reason: format!("{:?} is not a non-negative decimal", value.as_str()),
                    });
                }
            }
        }
        Ok(value.as_str())
    }
}

fn out_of_range(field: &'static str, value: u32, digits: usize) -> QrError {
    QrError::InvalidFieldValue {
        field,
        reason: format!("{} does not fit in {} digits", value, digits),
    }
}

/// Encodes `payload` with the default, permissive configuration.
pub fn encode(payload: &Payload) -> Result<String> {
    PayloadEncoder::default().encode(payload)
}
