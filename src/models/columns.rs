use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields of the canonical daily schema a source column can map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    Date,
    MaxTemp,
    MinTemp,
    MeanTemp,
    TotalPrecip,
}

impl CanonicalField {
    /// Columns every raw file must carry.
    pub const REQUIRED: [CanonicalField; 4] = [
        CanonicalField::Date,
        CanonicalField::MaxTemp,
        CanonicalField::MinTemp,
        CanonicalField::MeanTemp,
    ];

    pub fn output_name(&self) -> &'static str {
        match self {
            CanonicalField::Date => "Date",
            CanonicalField::MaxTemp => "Max_Temp_C",
            CanonicalField::MinTemp => "Min_Temp_C",
            CanonicalField::MeanTemp => "Mean_Temp_C",
            CanonicalField::TotalPrecip => "Total_Precip_mm",
        }
    }

    fn slot(&self) -> usize {
        match self {
            CanonicalField::Date => 0,
            CanonicalField::MaxTemp => 1,
            CanonicalField::MinTemp => 2,
            CanonicalField::MeanTemp => 3,
            CanonicalField::TotalPrecip => 4,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.output_name())
    }
}

/// Unit a source column is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceUnit {
    None,
    Celsius,
    Fahrenheit,
    Millimetres,
    Centimetres,
    Inches,
}

impl SourceUnit {
    /// Convert a value into the canonical unit (°C or mm).
    pub fn to_canonical(&self, value: f32) -> f32 {
        let converted = match self {
            SourceUnit::None | SourceUnit::Celsius | SourceUnit::Millimetres => return value,
            SourceUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            SourceUnit::Centimetres => value * 10.0,
            SourceUnit::Inches => value * 25.4,
        };
        (converted * 10.0).round() / 10.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedColumn {
    pub index: usize,
    pub header: String,
    pub unit: SourceUnit,
}

/// Resolved placement of canonical fields within one raw file's header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMapping {
    slots: [Option<MappedColumn>; 5],
    pub ignored: Vec<String>,
}

impl ColumnMapping {
    pub fn get(&self, field: CanonicalField) -> Option<&MappedColumn> {
        self.slots[field.slot()].as_ref()
    }

    pub fn has(&self, field: CanonicalField) -> bool {
        self.get(field).is_some()
    }

    /// Assign a column to a field unless an earlier column already claimed it.
    pub fn assign(&mut self, field: CanonicalField, column: MappedColumn) -> bool {
        let slot = &mut self.slots[field.slot()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(column);
        true
    }

    pub fn missing_required(&self) -> Vec<CanonicalField> {
        CanonicalField::REQUIRED
            .into_iter()
            .filter(|field| !self.has(*field))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion() {
        assert_eq!(SourceUnit::Celsius.to_canonical(-12.3), -12.3);
        assert_eq!(SourceUnit::Fahrenheit.to_canonical(212.0), 100.0);
        assert_eq!(SourceUnit::Fahrenheit.to_canonical(0.0), -17.8);
        assert_eq!(SourceUnit::Inches.to_canonical(1.0), 25.4);
        assert_eq!(SourceUnit::Centimetres.to_canonical(1.25), 12.5);
    }

    #[test]
    fn test_first_assignment_wins() {
        let mut mapping = ColumnMapping::default();
        let first = MappedColumn {
            index: 0,
            header: "Date/Time".to_string(),
            unit: SourceUnit::None,
        };
        let second = MappedColumn {
            index: 5,
            header: "Date".to_string(),
            unit: SourceUnit::None,
        };

        assert!(mapping.assign(CanonicalField::Date, first));
        assert!(!mapping.assign(CanonicalField::Date, second));
        assert_eq!(mapping.get(CanonicalField::Date).unwrap().index, 0);
        assert_eq!(
            mapping.missing_required(),
            vec![
                CanonicalField::MaxTemp,
                CanonicalField::MinTemp,
                CanonicalField::MeanTemp
            ]
        );
    }
}
