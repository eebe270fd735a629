//! Shareable configuration links.
//!
//! A link carries a versioned JSON snapshot of the configuration, base64url
//! encoded into the `config` query parameter:
//!
//! ```text
//! https://shop.example/vanity-designer?config=eyJ2IjoxLCJ3aWR0aCI6...
//! ```
//!
//! Payloads without a `v` field predate versioning and decode as version 1.
//! Decoding accepts both base64 alphabets, with or without padding.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{SHARE_LINK_VERSION, SHARE_QUERY_PARAM};
use crate::error::{QuoteError, Result};
use crate::model::{
    Brand, CabinetPosition, CountertopSelection, Dimension, DoorStyle, Fixtures, HandleStyle,
    VanityConfiguration,
};

/// Configuration fields carried by a share link. Every field is optional so
/// partial and older payloads still decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<u32>,
    #[serde(default)]
    pub width: Option<Dimension>,
    #[serde(default)]
    pub height: Option<Dimension>,
    #[serde(default)]
    pub depth: Option<Dimension>,
    #[serde(default)]
    pub brand: Option<Brand>,
    #[serde(default)]
    pub finish: Option<String>,
    #[serde(default)]
    pub door_style: Option<DoorStyle>,
    #[serde(default)]
    pub num_drawers: Option<u8>,
    #[serde(default)]
    pub handle_style: Option<HandleStyle>,
    #[serde(default)]
    pub cabinet_position: Option<CabinetPosition>,
    #[serde(default)]
    pub countertop: Option<CountertopSelection>,
    #[serde(default)]
    pub include_room: Option<bool>,
    #[serde(default)]
    pub room_length: Option<u32>,
    #[serde(default)]
    pub room_width: Option<u32>,
    #[serde(default)]
    pub floor_tile_style: Option<String>,
    #[serde(default)]
    pub fixtures: Option<Fixtures>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl SharedConfiguration {
    /// Snapshot every field of a configuration at the current schema version.
    pub fn from_configuration(config: &VanityConfiguration) -> Self {
        Self {
            v: Some(SHARE_LINK_VERSION),
            width: Some(config.width),
            height: Some(config.height),
            depth: Some(config.depth),
            brand: Some(config.brand),
            finish: Some(config.finish.clone()),
            door_style: Some(config.door_style),
            num_drawers: Some(config.num_drawers),
            handle_style: Some(config.handle_style),
            cabinet_position: Some(config.cabinet_position),
            countertop: config.countertop.clone(),
            include_room: Some(config.include_room),
            room_length: Some(config.room_length),
            room_width: Some(config.room_width),
            floor_tile_style: Some(config.floor_tile_style.clone()),
            fixtures: Some(config.fixtures.clone()),
            zip_code: config.zip_code.clone(),
            state: config.state.clone(),
        }
    }

    /// Schema version, treating unversioned payloads as version 1.
    pub fn version(&self) -> u32 {
        self.v.unwrap_or(1)
    }

    /// Overwrite the fields present in this snapshot.
    pub fn apply_to(&self, config: &mut VanityConfiguration) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut config.width, &self.width);
        set(&mut config.height, &self.height);
        set(&mut config.depth, &self.depth);
        set(&mut config.brand, &self.brand);
        set(&mut config.finish, &self.finish);
        set(&mut config.door_style, &self.door_style);
        set(&mut config.num_drawers, &self.num_drawers);
        set(&mut config.handle_style, &self.handle_style);
        set(&mut config.cabinet_position, &self.cabinet_position);
        set(&mut config.include_room, &self.include_room);
        set(&mut config.room_length, &self.room_length);
        set(&mut config.room_width, &self.room_width);
        set(&mut config.floor_tile_style, &self.floor_tile_style);
        set(&mut config.fixtures, &self.fixtures);
        if self.countertop.is_some() {
            config.countertop = self.countertop.clone();
        }
        if self.zip_code.is_some() {
            config.zip_code = self.zip_code.clone();
        }
        if self.state.is_some() {
            config.state = self.state.clone();
        }
    }

    /// A full configuration: defaults overlaid with this snapshot.
    pub fn into_configuration(self) -> VanityConfiguration {
        let mut config = VanityConfiguration::default();
        self.apply_to(&mut config);
        config
    }
}

/// Encode the `config` parameter value for a configuration.
pub fn encode_share_param(config: &VanityConfiguration) -> Result<String> {
    let json = serde_json::to_vec(&SharedConfiguration::from_configuration(config))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Build a share link by appending the `config` parameter to a base URL.
pub fn encode_share_link(base_url: &str, config: &VanityConfiguration) -> Result<String> {
    let mut url = Url::parse(base_url).map_err(|e| QuoteError::InvalidShareUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;
    let param = encode_share_param(config)?;

    // Replace any stale config parameter, keep everything else.
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != SHARE_QUERY_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(SHARE_QUERY_PARAM, &param);

    Ok(url.into())
}

/// Decode a `config` parameter value.
pub fn try_decode_share_param(value: &str) -> Result<SharedConfiguration> {
    let failed = |message: String| QuoteError::LinkDecodeFailed { message };

    // Form decoding turns an unescaped '+' from the standard alphabet into ' '.
    let cleaned: String = value
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();
    if cleaned.is_empty() {
        return Err(failed("empty config parameter".to_string()));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(&cleaned)
        .or_else(|_| STANDARD_NO_PAD.decode(&cleaned))
        .map_err(|e| failed(format!("invalid base64: {}", e)))?;

    let shared: SharedConfiguration =
        serde_json::from_slice(&bytes).map_err(|e| failed(format!("invalid JSON: {}", e)))?;

    if shared.version() > SHARE_LINK_VERSION || shared.version() == 0 {
        return Err(failed(format!(
            "unsupported link version {}",
            shared.version()
        )));
    }

    Ok(shared)
}

/// Decode a share link given as a full URL, a query string, or `config=...`.
pub fn try_decode_share_link(input: &str) -> Result<SharedConfiguration> {
    let input = input.trim();
    let param = match Url::parse(input) {
        Ok(url) => find_param(url.query().unwrap_or_default()),
        Err(_) => find_param(input.trim_start_matches('?')),
    };

    match param {
        Some(value) => try_decode_share_param(&value),
        None => Err(QuoteError::LinkDecodeFailed {
            message: format!("no '{}' parameter", SHARE_QUERY_PARAM),
        }),
    }
}

/// Decode a share link, treating any malformed or missing payload as "no
/// shared configuration".
pub fn decode_share_link(input: &str) -> Option<SharedConfiguration> {
    match try_decode_share_link(input) {
        Ok(shared) => Some(shared),
        Err(err) => {
            tracing::debug!("Ignoring share link: {}", err);
            None
        }
    }
}

fn find_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == SHARE_QUERY_PARAM)
        .map(|(_, v)| v.into_owned())
}
