//! Mapping resolution: turns source configuration into a checked [`FieldMapping`].
//!
//! Every problem is reported as a [`ConfigurationError`] before the first
//! record is read. A merge never starts with a mapping that could fail for
//! configuration reasons mid-stream.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::debug;
use unify_model::{
    ConfigurationError, FieldMappingSpec, Gender, SourceConfig, SourceIdentity, TableSourceConfig,
    TargetTable, TransformSpec, normalize_column_name,
};
use unify_transform::{
    DEFAULT_MIN_YEAR, DateTransformer, GenderTransformer, LocaleProfile, LookupTransformer,
    SalaryTransformer, TextTransformer, TimestampTransformer, Transformer,
};

use crate::exclusion::{ExclusionFilter, ExclusionRule};
use crate::mapping::{FieldMapping, MappingEntry};
use crate::missing::{DEFAULT_NULL_TOKENS, NullTokens};

/// Run-wide settings shared by every mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveContext {
    /// Reference date: upper bound of plausible dates and base year for ages.
    pub as_of: NaiveDate,
    pub null_tokens: Vec<String>,
    /// Drop rows with more than this fraction of missing values.
    pub sparse_row_threshold: Option<f64>,
}

impl ResolveContext {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
            sparse_row_threshold: None,
        }
    }

    pub fn with_null_tokens(mut self, tokens: Vec<String>) -> Self {
        self.null_tokens = tokens;
        self
    }

    pub fn with_sparse_row_threshold(mut self, threshold: Option<f64>) -> Self {
        self.sparse_row_threshold = threshold;
        self
    }
}

/// Supplies resolved mappings by source id.
pub trait MappingSource {
    fn resolve(&self, source_id: &str, table: TargetTable) -> Result<FieldMapping, ConfigurationError>;
}

/// Checks the identity fields that get stamped onto every record.
pub fn resolve_identity(config: &SourceConfig) -> Result<SourceIdentity, ConfigurationError> {
    let id = config.label.trim().to_string();
    let country_code = id.to_ascii_uppercase();
    if !(2..=3).contains(&country_code.len()) || !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigurationError::InvalidCountryCode {
            source_id: id,
            code: config.label.clone(),
        });
    }
    let currency = config.currency.trim().to_ascii_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigurationError::InvalidCurrency {
            source_id: id,
            currency: config.currency.clone(),
        });
    }
    if config.payment_period == 0 {
        return Err(ConfigurationError::InvalidPaymentPeriod { source_id: id });
    }
    let dial_code = config
        .dial_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string);
    Ok(SourceIdentity {
        id,
        country_code,
        currency,
        dial_code,
    })
}

/// Resolve one source's mapping onto `table`.
pub fn resolve_mapping(
    config: &SourceConfig,
    table: TargetTable,
    context: &ResolveContext,
) -> Result<FieldMapping, ConfigurationError> {
    if let Some(value) = context.sparse_row_threshold
        && !(0.0..=1.0).contains(&value)
    {
        return Err(ConfigurationError::InvalidThreshold { value });
    }
    let identity = resolve_identity(config)?;
    let source_id = identity.id.clone();
    let Some(table_config) = config.table(table) else {
        return Err(ConfigurationError::MissingTable { source_id, table });
    };

    let mut resolved: BTreeMap<&'static str, MappingEntry> = BTreeMap::new();
    for (name, spec) in &table_config.fields {
        let entry = resolve_entry(config, &identity, table, name, spec, context)?;
        resolved.insert(entry.name(), entry);
    }

    for spec in table.required_fields().filter(|spec| !spec.is_stamped()) {
        if !resolved.contains_key(spec.name) {
            return Err(ConfigurationError::MissingRequiredField {
                source_id,
                table,
                field: spec.name.to_string(),
            });
        }
    }

    let entries: Vec<MappingEntry> = table
        .fields()
        .iter()
        .filter_map(|spec| resolved.remove(spec.name))
        .collect();

    let null_tokens = NullTokens::new(&context.null_tokens);
    let filter = resolve_filter(&source_id, table_config, context, &null_tokens)?;

    debug!(
        source = %source_id,
        table = %table,
        fields = entries.len(),
        exclusions = filter.rules().len(),
        "resolved field mapping"
    );

    Ok(FieldMapping::new(identity, table, entries, filter, null_tokens)
        .with_natural_key(table_config.natural_key.as_deref()))
}

fn resolve_filter(
    source_id: &str,
    table_config: &TableSourceConfig,
    context: &ResolveContext,
    null_tokens: &NullTokens,
) -> Result<ExclusionFilter, ConfigurationError> {
    let rules = table_config
        .exclusions
        .iter()
        .map(|spec| ExclusionRule::compile(source_id, spec))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ExclusionFilter::new(rules).with_sparse_row_threshold(context.sparse_row_threshold, null_tokens.clone()))
}

fn resolve_entry(
    config: &SourceConfig,
    identity: &SourceIdentity,
    table: TargetTable,
    name: &str,
    spec: &FieldMappingSpec,
    context: &ResolveContext,
) -> Result<MappingEntry, ConfigurationError> {
    let source_id = identity.id.clone();
    let Some(field) = table.field(name) else {
        return Err(ConfigurationError::UnknownField {
            source_id,
            table,
            field: name.to_string(),
        });
    };
    if field.is_stamped() {
        return Err(ConfigurationError::StampedField {
            source_id,
            table,
            field: name.to_string(),
        });
    }

    let transformer = build_transformer(config, identity, table, name, &spec.transform, context)?;
    let actual = transformer.output_kind();
    if actual != field.kind {
        return Err(ConfigurationError::KindMismatch {
            source_id,
            table,
            field: name.to_string(),
            expected: field.kind,
            actual,
        });
    }

    let expected_columns = transformer.positional_columns();
    let column_count_ok = match expected_columns {
        Some(expected) => spec.columns.len() == expected,
        None => !spec.columns.is_empty(),
    };
    if !column_count_ok {
        return Err(ConfigurationError::ColumnCount {
            source_id,
            table,
            field: name.to_string(),
            expected: expected_columns.unwrap_or(1),
            actual: spec.columns.len(),
        });
    }

    if spec.default.is_some() && expected_columns.is_some() {
        return Err(ConfigurationError::InvalidDefault {
            source_id,
            table,
            field: name.to_string(),
            message: format!("{} reads several columns and takes no default", transformer.name()),
        });
    }
    if let Some(default) = &spec.default
        && let Err(err) = transformer.apply(&[default.as_str()])
    {
        return Err(ConfigurationError::InvalidDefault {
            source_id,
            table,
            field: name.to_string(),
            message: err.to_string(),
        });
    }

    Ok(MappingEntry {
        field,
        columns: spec.columns.iter().map(|c| normalize_column_name(c)).collect(),
        transformer,
        required: field.required || spec.required,
        default: spec.default.clone(),
    })
}

fn build_transformer(
    config: &SourceConfig,
    identity: &SourceIdentity,
    table: TargetTable,
    name: &str,
    spec: &TransformSpec,
    context: &ResolveContext,
) -> Result<Transformer, ConfigurationError> {
    let source_id = || identity.id.clone();
    let transformer = match spec {
        TransformSpec::Text { case, max_length } => {
            Transformer::Text(TextTransformer::new(*case, *max_length))
        }
        TransformSpec::Date {
            formats,
            year_from_age,
            min_year,
        } => {
            if formats.is_empty() {
                return Err(ConfigurationError::EmptyDateFormats {
                    source_id: source_id(),
                    table,
                    field: name.to_string(),
                });
            }
            Transformer::Date(
                DateTransformer::new(formats.clone(), context.as_of)
                    .with_min_year(min_year.unwrap_or(DEFAULT_MIN_YEAR))
                    .with_year_from_age(*year_from_age),
            )
        }
        TransformSpec::Salary => {
            let Some(profile) = LocaleProfile::from_name(&config.locale) else {
                return Err(ConfigurationError::UnknownLocale {
                    source_id: source_id(),
                    locale: config.locale.clone(),
                });
            };
            Transformer::Salary(SalaryTransformer::new(
                profile,
                identity.currency.clone(),
                config.payment_period,
            ))
        }
        TransformSpec::GenderCode => {
            let mut mapping = BTreeMap::new();
            for (token, label) in &config.gender_mapping {
                let gender = label
                    .parse::<Gender>()
                    .map_err(|_| ConfigurationError::InvalidGenderLabel {
                        source_id: source_id(),
                        token: token.clone(),
                        label: label.clone(),
                    })?;
                mapping.insert(token.clone(), gender);
            }
            Transformer::GenderCode(GenderTransformer::new(mapping))
        }
        TransformSpec::Timestamp => {
            let Some(timezone) = config.timezone.as_deref() else {
                return Err(ConfigurationError::MissingTimezone {
                    source_id: source_id(),
                    field: name.to_string(),
                });
            };
            let tz = timezone
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigurationError::InvalidTimezone {
                    source_id: source_id(),
                    timezone: timezone.to_string(),
                })?;
            Transformer::Timestamp(TimestampTransformer::new(tz))
        }
        TransformSpec::Phone => Transformer::Phone,
        TransformSpec::PasswordHash => Transformer::PasswordHash,
        TransformSpec::Lookup { table: lookup } => {
            let Some(values) = config.lookups.get(lookup) else {
                return Err(ConfigurationError::UnknownLookup {
                    source_id: source_id(),
                    field: name.to_string(),
                    lookup: lookup.clone(),
                });
            };
            Transformer::Lookup(LookupTransformer::new(lookup.clone(), values.clone()))
        }
        TransformSpec::Integer => Transformer::Integer,
    };
    Ok(transformer)
}

/// Source configurations in declared order, resolved on demand.
#[derive(Debug, Clone)]
pub struct MappingRegistry {
    sources: Vec<SourceConfig>,
    context: ResolveContext,
}

impl MappingRegistry {
    pub fn new(context: ResolveContext) -> Self {
        Self {
            sources: Vec::new(),
            context,
        }
    }

    /// Add a source; labels must be unique (case-insensitive).
    pub fn insert(&mut self, config: SourceConfig) -> Result<(), ConfigurationError> {
        let label = config.label.trim();
        if self.get(label).is_some() {
            return Err(ConfigurationError::DuplicateSource {
                source_id: label.to_string(),
            });
        }
        self.sources.push(config);
        Ok(())
    }

    pub fn context(&self) -> &ResolveContext {
        &self.context
    }

    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|config| config.label.trim())
    }

    pub fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    pub fn get(&self, source_id: &str) -> Option<&SourceConfig> {
        self.sources
            .iter()
            .find(|config| config.label.trim().eq_ignore_ascii_case(source_id.trim()))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl MappingSource for MappingRegistry {
    fn resolve(&self, source_id: &str, table: TargetTable) -> Result<FieldMapping, ConfigurationError> {
        let Some(config) = self.get(source_id) else {
            return Err(ConfigurationError::UnknownSource {
                source_id: source_id.to_string(),
            });
        };
        resolve_mapping(config, table, &self.context)
    }
}
