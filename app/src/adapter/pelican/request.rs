use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Thermostat,
    ThermostatHistory,
    ThermostatSchedule,
}

/// One call of the vendor API: `request` + `object`, a `selection` picking the target and a
/// `value` list naming the attributes to read or the attribute/value pairs to write.
///
/// Both lists are encoded as `key:value` pairs separated by `;`. Attributes without value are
/// written as bare names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    kind: RequestKind,
    object: ObjectType,
    selection: Vec<(String, Option<String>)>,
    value: Vec<(String, Option<String>)>,
}

impl ApiRequest {
    pub fn get(object: ObjectType) -> Self {
        Self::new(RequestKind::Get, object)
    }

    pub fn set(object: ObjectType) -> Self {
        Self::new(RequestKind::Set, object)
    }

    fn new(kind: RequestKind, object: ObjectType) -> Self {
        Self {
            kind,
            object,
            selection: vec![],
            value: vec![],
        }
    }

    pub fn select(mut self, key: &str, value: impl ToString) -> Self {
        self.selection.push((key.to_owned(), Some(value.to_string())));
        self
    }

    pub fn attributes(mut self, names: &[&str]) -> Self {
        self.value
            .extend(names.iter().map(|name| ((*name).to_owned(), None)));
        self
    }

    pub fn assign(mut self, key: &str, value: impl ToString) -> Self {
        self.value.push((key.to_owned(), Some(value.to_string())));
        self
    }

    pub fn flag(mut self, key: &str) -> Self {
        self.value.push((key.to_owned(), None));
        self
    }

    pub fn object(&self) -> ObjectType {
        self.object
    }

    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("request", self.kind.to_string()), ("object", self.object.to_string())];

        if !self.selection.is_empty() {
            params.push(("selection", join_pairs(&self.selection)));
        }

        if !self.value.is_empty() {
            params.push(("value", join_pairs(&self.value)));
        }

        params
    }
}

fn join_pairs(pairs: &[(String, Option<String>)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| match value {
            Some(value) => format!("{}:{}", key, value),
            None => key.clone(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

impl Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestKind::Get => write!(f, "get"),
            RequestKind::Set => write!(f, "set"),
        }
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectType::Thermostat => write!(f, "Thermostat"),
            ObjectType::ThermostatHistory => write!(f, "ThermostatHistory"),
            ObjectType::ThermostatSchedule => write!(f, "ThermostatSchedule"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_with_selection_and_attributes() {
        let request = ApiRequest::get(ObjectType::Thermostat)
            .select("name", "TestThermostat")
            .attributes(&["heatSetting", "coolSetting", "temperature"]);

        assert_eq!(
            request.query_params(),
            vec![
                ("request", "get".to_owned()),
                ("object", "Thermostat".to_owned()),
                ("selection", "name:TestThermostat".to_owned()),
                ("value", "heatSetting;coolSetting;temperature".to_owned()),
            ]
        );
    }

    #[test]
    fn set_with_assignment() {
        let request = ApiRequest::set(ObjectType::Thermostat)
            .select("name", "TstatnoHP")
            .assign("coolSetting", 74);

        assert_eq!(
            request.query_params(),
            vec![
                ("request", "set".to_owned()),
                ("object", "Thermostat".to_owned()),
                ("selection", "name:TstatnoHP".to_owned()),
                ("value", "coolSetting:74".to_owned()),
            ]
        );
    }

    #[test]
    fn empty_selection_and_value_are_omitted() {
        let request = ApiRequest::get(ObjectType::ThermostatSchedule);

        assert_eq!(
            request.query_params(),
            vec![("request", "get".to_owned()), ("object", "ThermostatSchedule".to_owned())]
        );
    }

    #[test]
    fn value_only() {
        let request = ApiRequest::get(ObjectType::Thermostat).attributes(&["name"]);

        assert_eq!(request.query_params()[2], ("value", "name".to_owned()));
    }

    #[test]
    fn flag_is_written_as_bare_key() {
        let request = ApiRequest::set(ObjectType::ThermostatSchedule)
            .select("name", "T1")
            .select("dayOfWeek", "Monday")
            .select("setTime", 2)
            .flag("delete");

        assert_eq!(request.query_params()[2], ("selection", "name:T1;dayOfWeek:Monday;setTime:2".to_owned()));
        assert_eq!(request.query_params()[3], ("value", "delete".to_owned()));
    }
}
