use chrono::NaiveDate;

use super::event::{Event, EventName};

/// How a content item was viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    Gallery,
    Details,
}

impl ViewType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gallery => "gallery",
            Self::Details => "details",
        }
    }
}

/// Kinds of generic section interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Click,
    Scroll,
    Hover,
}

impl InteractionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Scroll => "scroll",
            Self::Hover => "hover",
        }
    }
}

/// Assemble a page-view event.
pub fn page_view(page_path: &str, page_title: &str) -> Event {
    Event::new(EventName::PageView)
        .with("page_path", page_path)
        .with("page_title", page_title)
}

/// Assemble a contact-channel click event. The phone number is attached
/// only when the clicked channel exposes one.
pub fn whatsapp_click(source: &str, phone_number: Option<&str>) -> Event {
    let event = Event::new(EventName::WhatsappClick).with("source", source);
    match phone_number {
        Some(number) => event.with("phone_number", number),
        None => event,
    }
}

/// Assemble a content-item view event.
pub fn room_view(room_id: &str, room_name: &str, view_type: ViewType) -> Event {
    Event::new(EventName::RoomView)
        .with("room_id", room_id)
        .with("room_name", room_name)
        .with("view_type", view_type.as_str())
}

/// Assemble a date-range selection event. When the caller does not
/// supply a night count it is derived from the ISO dates; unparseable
/// or inverted ranges count as 0 nights rather than failing.
pub fn date_selection(check_in: &str, check_out: &str, nights: Option<u32>) -> Event {
    let nights = nights.unwrap_or_else(|| nights_between(check_in, check_out));

    Event::new(EventName::DateSelection)
        .with("check_in", check_in)
        .with("check_out", check_out)
        .with("nights", nights)
}

/// Assemble a price-check event.
pub fn price_check(room_id: &str, source: &str) -> Event {
    Event::new(EventName::PriceCheck)
        .with("room_id", room_id)
        .with("source", source)
}

/// Assemble a generic section-interaction event.
pub fn section_interaction(section: &str, kind: InteractionKind, page_url: &str) -> Event {
    Event::new(EventName::SectionInteraction)
        .with("section", section)
        .with("action", kind.as_str())
        .with("page_url", page_url)
}

/// Assemble a media-item click event.
pub fn image_click(image_id: &str, gallery_name: &str, page_url: &str) -> Event {
    Event::new(EventName::ImageClick)
        .with("image_id", image_id)
        .with("gallery_name", gallery_name)
        .with("page_url", page_url)
}

/// Assemble a media playback start event.
pub fn video_play(video_id: &str, video_title: &str, page_url: &str) -> Event {
    Event::new(EventName::VideoPlay)
        .with("video_id", video_id)
        .with("video_title", video_title)
        .with("page_url", page_url)
}

/// Whole nights between two ISO dates, 0 for unparseable or inverted
/// input.
fn nights_between(check_in: &str, check_out: &str) -> u32 {
    match (
        NaiveDate::parse_from_str(check_in, "%Y-%m-%d"),
        NaiveDate::parse_from_str(check_out, "%Y-%m-%d"),
    ) {
        (Ok(start), Ok(end)) => (end - start).num_days().max(0) as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::event::AttrValue;

    #[test]
    fn test_nights_between() {
        assert_eq!(nights_between("2026-08-01", "2026-08-05"), 4);
        assert_eq!(nights_between("2026-08-01", "2026-08-01"), 0);
        // Inverted range.
        assert_eq!(nights_between("2026-08-05", "2026-08-01"), 0);
        // Garbage in, zero out.
        assert_eq!(nights_between("not-a-date", "2026-08-01"), 0);
        assert_eq!(nights_between("2026-08-01", ""), 0);
    }

    #[test]
    fn test_date_selection_derives_nights() {
        let event = date_selection("2026-08-01", "2026-08-04", None);
        assert_eq!(event.attr("nights"), Some(&AttrValue::Int(3)));

        let explicit = date_selection("2026-08-01", "2026-08-04", Some(7));
        assert_eq!(explicit.attr("nights"), Some(&AttrValue::Int(7)));
    }

    #[test]
    fn test_whatsapp_click_optional_phone() {
        let bare = whatsapp_click("hero_button", None);
        assert_eq!(bare.attr("phone_number"), None);
        assert_eq!(
            bare.attr("source"),
            Some(&AttrValue::Str("hero_button".to_string()))
        );

        let full = whatsapp_click("footer", Some("+3412345678"));
        assert_eq!(
            full.attr("phone_number"),
            Some(&AttrValue::Str("+3412345678".to_string()))
        );
    }

    #[test]
    fn test_room_view_schema() {
        let event = room_view("suite-1", "Garden Suite", ViewType::Gallery);
        assert_eq!(event.name, EventName::RoomView);
        assert_eq!(
            event.attr("view_type"),
            Some(&AttrValue::Str("gallery".to_string()))
        );
    }

    #[test]
    fn test_section_interaction_schema() {
        let event = section_interaction("rooms", InteractionKind::Hover, "/rooms");
        assert_eq!(
            event.attr("action"),
            Some(&AttrValue::Str("hover".to_string()))
        );
        assert_eq!(
            event.attr("page_url"),
            Some(&AttrValue::Str("/rooms".to_string()))
        );
    }

    #[test]
    fn test_view_type_labels() {
        assert_eq!(ViewType::Gallery.as_str(), "gallery");
        assert_eq!(ViewType::Details.as_str(), "details");
    }

    #[test]
    fn test_interaction_kind_labels() {
        assert_eq!(InteractionKind::Click.as_str(), "click");
        assert_eq!(InteractionKind::Scroll.as_str(), "scroll");
        assert_eq!(InteractionKind::Hover.as_str(), "hover");
    }
}
