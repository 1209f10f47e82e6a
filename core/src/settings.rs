use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Client configuration dialect a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreType {
    Xray,
    SingBox,
}

impl CoreType {
    pub fn name(self) -> &'static str {
        match self {
            CoreType::Xray => "xray",
            CoreType::SingBox => "sing-box",
        }
    }

    /// File name of this dialect's template inside the template directory.
    pub fn template_file(self) -> &'static str {
        match self {
            CoreType::Xray => "xray.json",
            CoreType::SingBox => "sing-box.json",
        }
    }
}

impl FromStr for CoreType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xray" => Ok(CoreType::Xray),
            "sing-box" => Ok(CoreType::SingBox),
            other => Err(Error::UnsupportedCoreType(other.to_string())),
        }
    }
}

impl fmt::Display for CoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// TLS client-hello fingerprint requested from the client core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fingerprint {
    Chrome,
    Firefox,
    Safari,
    Ios,
    Android,
    Edge,
    Qihoo360,
    Qq,
    Random,
    Randomized,
}

impl Fingerprint {
    pub const ALL: [Fingerprint; 10] = [
        Fingerprint::Chrome,
        Fingerprint::Firefox,
        Fingerprint::Safari,
        Fingerprint::Ios,
        Fingerprint::Android,
        Fingerprint::Edge,
        Fingerprint::Qihoo360,
        Fingerprint::Qq,
        Fingerprint::Random,
        Fingerprint::Randomized,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Fingerprint::Chrome => "chrome",
            Fingerprint::Firefox => "firefox",
            Fingerprint::Safari => "safari",
            Fingerprint::Ios => "ios",
            Fingerprint::Android => "android",
            Fingerprint::Edge => "edge",
            Fingerprint::Qihoo360 => "360",
            Fingerprint::Qq => "qq",
            Fingerprint::Random => "random",
            Fingerprint::Randomized => "randomized",
        }
    }
}

impl FromStr for Fingerprint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fingerprint::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Fingerprint::ALL.iter().map(|f| f.as_str()).collect();
                format!("unknown fingerprint {:?}, expected one of: {}", s, names.join(", "))
            })
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Resolved run options. Built once from the command line and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub socks_port: u16,
    pub http_port: u16,
    /// Local redirect port; `None` when disabled.
    pub cutter_port: Option<u16>,
    /// Literal endpoint address that bypasses ranking.
    pub ip_override: Option<String>,
    pub port: u16,
    pub fingerprint: Fingerprint,
    pub host: String,
    /// Explicit client identity; resolved at conversion time when `None`.
    pub uuid: Option<String>,
    pub download_sort: String,
    /// Takes priority over `download_sort` when set.
    pub upload_sort: Option<String>,
    pub number: usize,
    /// Kept as given; validated when a template is selected.
    pub core_type: String,
    /// Client executable, passed to the shell as written.
    pub binpath: Option<String>,
    pub config_number: u32,
    pub convert: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            socks_port: 10808,
            http_port: 10809,
            cutter_port: None,
            ip_override: None,
            port: 443,
            fingerprint: Fingerprint::Chrome,
            host: "Lille.kotick.site".to_string(),
            uuid: None,
            download_sort: "speed".to_string(),
            upload_sort: None,
            number: 5,
            core_type: "xray".to_string(),
            binpath: None,
            config_number: 1,
            convert: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_type_names_round_trip() {
        assert_eq!("xray".parse::<CoreType>().unwrap(), CoreType::Xray);
        assert_eq!("sing-box".parse::<CoreType>().unwrap(), CoreType::SingBox);
        assert_eq!(CoreType::SingBox.template_file(), "sing-box.json");
    }

    #[test]
    fn unknown_core_type_is_rejected() {
        let err = "v2fly".parse::<CoreType>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedCoreType(ref s) if s == "v2fly"));
    }

    #[test]
    fn fingerprint_accepts_every_listed_name() {
        for f in Fingerprint::ALL {
            assert_eq!(f.as_str().parse::<Fingerprint>().unwrap(), f);
        }
        assert_eq!("360".parse::<Fingerprint>().unwrap(), Fingerprint::Qihoo360);
        assert!("opera".parse::<Fingerprint>().is_err());
    }
}
