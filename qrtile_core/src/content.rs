use base64::{engine::general_purpose::STANDARD, Engine};

/// Something that can be turned into the text payload of a QR code.
pub trait Content {
    /// Produce the payload handed to the symbol encoder.
    fn payload(&self) -> String;
}

/// Plain text, encoded verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringContent(pub String);

impl StringContent {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self(text.into())
    }
}

impl Content for StringContent {
    fn payload(&self) -> String {
        self.0.clone()
    }
}

/// Arbitrary bytes, carried as standard padded base64 so binary data survives as text.
/// # Example
/// ```
/// use qrtile_core::{BytesContent, Content};
/// assert_eq!(BytesContent::new(b"Hello, world!".to_vec()).payload(), "SGVsbG8sIHdvcmxkIQ==");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytesContent(pub Vec<u8>);

impl BytesContent {
    pub fn new<B: Into<Vec<u8>>>(bytes: B) -> Self {
        Self(bytes.into())
    }
}

impl Content for BytesContent {
    fn payload(&self) -> String {
        STANDARD.encode(&self.0)
    }
}

impl From<&str> for StringContent {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StringContent {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Vec<u8>> for BytesContent {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

/// Authentication scheme of a Wi-Fi network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityType {
    #[default]
    Wpa,
    Wpa2,
    Wep,
    /// Open network.
    NoPass,
}

impl SecurityType {
    /// The token used in the `T:` field of the Wi-Fi payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wpa => "WPA",
            Self::Wpa2 => "WPA2",
            Self::Wep => "WEP",
            Self::NoPass => "nopass",
        }
    }
}

impl std::fmt::Display for SecurityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SecurityType {
    type Err = UnknownSecurityType;

    /// Parse a security type, ignoring case.
    /// # Example
    /// ```
    /// use qrtile_core::SecurityType;
    /// assert_eq!("wpa2".parse::<SecurityType>().unwrap(), SecurityType::Wpa2);
    /// assert_eq!("NOPASS".parse::<SecurityType>().unwrap(), SecurityType::NoPass);
    /// assert!("wpa3-enterprise".parse::<SecurityType>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wpa" => Ok(Self::Wpa),
            "wpa2" => Ok(Self::Wpa2),
            "wep" => Ok(Self::Wep),
            "nopass" | "none" | "open" => Ok(Self::NoPass),
            _ => Err(UnknownSecurityType(s.to_owned())),
        }
    }
}

/// Error returned when parsing an unknown [SecurityType].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown security type '{0}', expected one of: WPA, WPA2, WEP, nopass")]
pub struct UnknownSecurityType(pub String);

/// Credentials of a Wi-Fi network, formatted as `WIFI:T:<type>;S:<ssid>;P:<password>;<hidden>;`.
///
/// ```
/// use qrtile_core::{Content, SecurityType, WifiContent};
/// let mut wifi = WifiContent::new("TP-Link", "12345", SecurityType::Wpa, false);
/// assert_eq!(wifi.payload(), "WIFI:T:WPA;S:TP-Link;P:12345;;");
/// wifi.set_hidden(true).set_password("pa;ss");
/// assert_eq!(wifi.payload(), "WIFI:T:WPA;S:TP-Link;P:pa\\;ss;H:true;");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiContent {
    ssid: String,
    password: String,
    security: SecurityType,
    hidden: bool,
}

impl WifiContent {
    pub fn new<S, P>(ssid: S, password: P, security: SecurityType, hidden: bool) -> Self
    where
        S: Into<String>,
        P: Into<String>,
    {
        Self {
            ssid: ssid.into(),
            password: password.into(),
            security,
            hidden,
        }
    }

    /// An open network.
    pub fn no_password<S: Into<String>>(ssid: S, hidden: bool) -> Self {
        Self::new(ssid, "", SecurityType::NoPass, hidden)
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn security_type(&self) -> SecurityType {
        self.security
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_ssid<S: Into<String>>(&mut self, ssid: S) -> &mut Self {
        self.ssid = ssid.into();
        self
    }

    pub fn set_password<P: Into<String>>(&mut self, password: P) -> &mut Self {
        self.password = password.into();
        self
    }

    /// Turn the network into an open one: clears the password and sets [SecurityType::NoPass].
    pub fn set_no_password(&mut self) -> &mut Self {
        self.password.clear();
        self.security = SecurityType::NoPass;
        self
    }

    pub fn set_security_type(&mut self, security: SecurityType) -> &mut Self {
        self.security = security;
        self
    }

    pub fn set_hidden(&mut self, hidden: bool) -> &mut Self {
        self.hidden = hidden;
        self
    }
}

impl Content for WifiContent {
    fn payload(&self) -> String {
        let hidden = if self.hidden { "H:true" } else { "" };
        format!(
            "WIFI:T:{};S:{};P:{};{};",
            self.security,
            self.ssid,
            escape_password(&self.password),
            hidden
        )
    }
}

fn escape_password(password: &str) -> String {
    password.replace(';', "\\;")
}
