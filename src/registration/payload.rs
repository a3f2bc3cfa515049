//! Registration request body.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::config::TelegrafConfig;

/// Body of `POST /api/v2/telegrafs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub description: String,
    /// Raw telegraf.conf contents, sent as-is.
    #[serde(rename = "telegraf")]
    pub configuration_text: String,
    pub active: bool,
}

impl RegistrationRequest {
    pub fn new(telegraf: &TelegrafConfig, configuration_text: String) -> Self {
        Self {
            name: telegraf.name.clone(),
            description: telegraf.description.clone(),
            configuration_text,
            active: true,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Read the whole configuration file as UTF-8 text.
pub fn read_configuration(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_wire_shape() {
        let request = RegistrationRequest::new(&TelegrafConfig::default(), "[agent]\n".into());
        let value: Value = serde_json::from_slice(&request.to_bytes().unwrap()).unwrap();

        assert_eq!(value["name"], "telegraf-from-compose");
        assert_eq!(value["description"], "Telegraf config imported from compose");
        assert_eq!(value["telegraf"], "[agent]\n");
        assert_eq!(value["active"], true);
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_configuration_text_is_verbatim() {
        let text = "[[inputs.cpu]]\n  percpu = true\n# \"quoted\" \\ tab\t ünïcode\r\n";
        let request = RegistrationRequest::new(&TelegrafConfig::default(), text.to_string());
        let decoded: Value = serde_json::from_slice(&request.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded["telegraf"].as_str(), Some(text));
    }

    #[test]
    fn test_read_configuration_rejects_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x5b, 0xff, 0xfe, 0x5d]).unwrap();
        let err = read_configuration(file.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_configuration_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_configuration(&dir.path().join("telegraf.conf")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
