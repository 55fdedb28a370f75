use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// EventName identifies the kind of behavioral event.
/// Labels match the names the downstream sink expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventName {
    PageView = 1,
    ComponentLoad = 2,
    ComponentUnload = 3,
    Scroll = 4,
    SectionView = 5,
    WhatsappClick = 6,
    RoomView = 7,
    DateSelection = 8,
    PriceCheck = 9,
    SectionInteraction = 10,
    ImageClick = 11,
    VideoPlay = 12,
}

/// Maximum EventName value, used for array sizing.
pub const MAX_EVENT_NAME: usize = 12;

impl EventName {
    /// Returns the canonical event label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PageView => "page_view",
            Self::ComponentLoad => "component_load",
            Self::ComponentUnload => "component_unload",
            Self::Scroll => "scroll",
            Self::SectionView => "section_view",
            Self::WhatsappClick => "whatsapp_click",
            Self::RoomView => "room_view",
            Self::DateSelection => "date_selection",
            Self::PriceCheck => "price_check",
            Self::SectionInteraction => "section_interaction",
            Self::ImageClick => "image_click",
            Self::VideoPlay => "video_play",
        }
    }

    /// Convert from a raw u8 value.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::PageView),
            2 => Some(Self::ComponentLoad),
            3 => Some(Self::ComponentUnload),
            4 => Some(Self::Scroll),
            5 => Some(Self::SectionView),
            6 => Some(Self::WhatsappClick),
            7 => Some(Self::RoomView),
            8 => Some(Self::DateSelection),
            9 => Some(Self::PriceCheck),
            10 => Some(Self::SectionInteraction),
            11 => Some(Self::ImageClick),
            12 => Some(Self::VideoPlay),
            _ => None,
        }
    }

    /// Convert from the canonical event label.
    pub fn from_str(name: &str) -> Option<Self> {
        match name {
            "page_view" => Some(Self::PageView),
            "component_load" => Some(Self::ComponentLoad),
            "component_unload" => Some(Self::ComponentUnload),
            "scroll" => Some(Self::Scroll),
            "section_view" => Some(Self::SectionView),
            "whatsapp_click" => Some(Self::WhatsappClick),
            "room_view" => Some(Self::RoomView),
            "date_selection" => Some(Self::DateSelection),
            "price_check" => Some(Self::PriceCheck),
            "section_interaction" => Some(Self::SectionInteraction),
            "image_click" => Some(Self::ImageClick),
            "video_play" => Some(Self::VideoPlay),
            _ => None,
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Scalar attribute value. The event contract only carries flat
/// string-or-number attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for AttrValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// A named behavioral occurrence with a fixed flat attribute schema.
/// Events are immutable once emitted and carry no identity beyond the
/// emission itself; deduplication happens upstream in the tracker.
#[derive(Debug, Clone)]
pub struct Event {
    pub name: EventName,
    attributes: BTreeMap<&'static str, AttrValue>,
}

impl Event {
    /// Create an event with no attributes.
    pub fn new(name: EventName) -> Self {
        Self {
            name,
            attributes: BTreeMap::new(),
        }
    }

    /// Attach an attribute, consuming and returning the event.
    pub fn with(mut self, key: &'static str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key, value.into());
        self
    }

    /// Look up an attribute by key.
    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    /// Number of attributes attached.
    pub fn attr_count(&self) -> usize {
        self.attributes.len()
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len() + 1))?;
        map.serialize_entry("event", self.name.as_str())?;
        for (k, v) in &self.attributes {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_label_round_trip() {
        for raw in 1..=MAX_EVENT_NAME {
            let name = EventName::from_u8(raw as u8).expect("valid discriminant");
            assert_eq!(EventName::from_str(name.as_str()), Some(name));
        }
    }

    #[test]
    fn test_from_u8_out_of_range() {
        assert_eq!(EventName::from_u8(0), None);
        assert_eq!(EventName::from_u8(13), None);
        assert_eq!(EventName::from_u8(255), None);
    }

    #[test]
    fn test_from_str_unknown() {
        assert_eq!(EventName::from_str("page_load"), None);
        assert_eq!(EventName::from_str(""), None);
    }

    #[test]
    fn test_event_builder() {
        let event = Event::new(EventName::Scroll).with("percent_scrolled", 75u32);

        assert_eq!(event.name, EventName::Scroll);
        assert_eq!(event.attr_count(), 1);
        assert_eq!(event.attr("percent_scrolled"), Some(&AttrValue::Int(75)));
        assert_eq!(event.attr("missing"), None);
    }

    #[test]
    fn test_event_serializes_as_flat_map() {
        let event = Event::new(EventName::SectionView)
            .with("section_id", "rooms")
            .with("page_url", "/");

        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["event"], "section_view");
        assert_eq!(json["section_id"], "rooms");
        assert_eq!(json["page_url"], "/");
    }

    #[test]
    fn test_attr_value_conversions() {
        assert_eq!(AttrValue::from("x"), AttrValue::Str("x".to_string()));
        assert_eq!(AttrValue::from(3i64), AttrValue::Int(3));
        assert_eq!(AttrValue::from(3u32), AttrValue::Int(3));
        assert_eq!(AttrValue::from(1.5f64), AttrValue::Float(1.5));
    }
}
