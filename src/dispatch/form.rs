use crate::core::{config::FormConfig, geo::LatLng};

/// A text input of the dispatch form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub name: String,
    pub value: String,
    pub placeholder: Option<String>,
    pub required: bool,
}

impl FormInput {
    pub fn is_missing(&self) -> bool {
        self.required && self.value.trim().is_empty()
    }
}

/// The route request form: an origin field written by map position
/// updates, plus any number of hospital inputs.
///
/// The origin field may not exist on a given page; writes to it are then
/// silently dropped.
#[derive(Debug, Clone)]
pub struct DispatchForm {
    config: FormConfig,
    origin: Option<FormInput>,
    hospitals: Vec<FormInput>,
}

impl DispatchForm {
    pub fn new(config: FormConfig) -> Self {
        let origin = FormInput {
            name: config.origin_field_id.clone(),
            value: String::new(),
            placeholder: None,
            required: true,
        };
        Self {
            config,
            origin: Some(origin),
            hospitals: Vec::new(),
        }
    }

    /// A page without an origin field
    pub fn without_origin_field(config: FormConfig) -> Self {
        Self {
            config,
            origin: None,
            hospitals: Vec::new(),
        }
    }

    pub fn has_origin_field(&self) -> bool {
        self.origin.is_some()
    }

    pub fn origin_value(&self) -> Option<&str> {
        self.origin.as_ref().map(|field| field.value.as_str())
    }

    /// Writes `"<lat>,<lng>"` into the origin field. Returns false when
    /// the field does not exist.
    pub fn set_origin(&mut self, position: LatLng) -> bool {
        let id = self.config.origin_field_id.clone();
        self.set_value(&id, position.to_string())
    }

    /// Sets a field by id; unknown ids are ignored
    pub fn set_value(&mut self, field_id: &str, value: impl Into<String>) -> bool {
        match self.origin.as_mut() {
            Some(field) if field.name == field_id => {
                field.value = value.into();
                true
            }
            _ => false,
        }
    }

    /// Appends an empty hospital input. Returns its index.
    pub fn add_hospital_input(&mut self) -> usize {
        self.hospitals.push(FormInput {
            name: self.config.hospitals_field_name.clone(),
            value: String::new(),
            placeholder: Some(self.config.hospital_placeholder.clone()),
            required: self.config.hospital_required,
        });
        self.hospitals.len() - 1
    }

    pub fn set_hospital(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.hospitals.get_mut(index) {
            Some(input) => {
                input.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn hospital_inputs(&self) -> &[FormInput] {
        &self.hospitals
    }

    /// Submitted `(name, value)` pairs in document order: origin first,
    /// then one pair per hospital input
    pub fn submission(&self) -> Vec<(String, String)> {
        self.origin
            .iter()
            .chain(self.hospitals.iter())
            .map(|input| (input.name.clone(), input.value.clone()))
            .collect()
    }

    /// Names of required inputs left empty, in document order
    pub fn missing_required(&self) -> Vec<String> {
        self.origin
            .iter()
            .chain(self.hospitals.iter())
            .filter(|input| input.is_missing())
            .map(|input| input.name.clone())
            .collect()
    }
}

impl Default for DispatchForm {
    fn default() -> Self {
        Self::new(FormConfig::default())
    }
}
