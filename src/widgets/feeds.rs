//! Network-backed state shared by the widget renderers.

use chrono::NaiveTime;
use dashboard_api::{CalendarFeed, OneDriveImage, Photo, Weather};

use super::photo::PhotoState;
use super::{CALENDAR_ID, CLOCK_ID, PHOTOS_ID, PHOTO_ID, WEATHER_ID};
use crate::remote::FetchSlot;

/// A backend endpoint a widget polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feed {
    Weather,
    Calendar,
    Photos,
    OneDrive,
}

impl Feed {
    pub const ALL: [Feed; 4] = [Feed::Weather, Feed::Calendar, Feed::Photos, Feed::OneDrive];

    /// Id of the widget that shows this feed.
    pub fn widget_id(self) -> &'static str {
        match self {
            Feed::Weather => WEATHER_ID,
            Feed::Calendar => CALENDAR_ID,
            Feed::Photos => PHOTOS_ID,
            Feed::OneDrive => PHOTO_ID,
        }
    }

    /// Feed shown by the widget `id`, if it has one.
    pub fn for_widget(id: &str) -> Option<Feed> {
        Feed::ALL.into_iter().find(|feed| feed.widget_id() == id)
    }
}

/// Payload of a completed fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedData {
    Weather(Weather),
    Calendar(CalendarFeed),
    Photos(Vec<Photo>),
    Image(OneDriveImage),
}

/// Everything the renderers read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feeds {
    /// Last time delivered by the clock timer.
    pub clock: Option<NaiveTime>,
    pub weather: FetchSlot<Weather>,
    pub calendar: FetchSlot<CalendarFeed>,
    pub photos: FetchSlot<Vec<Photo>>,
    pub photo: PhotoState,
}

impl Feeds {
    /// Registers a fetch for `feed` and returns its sequence number.
    pub fn begin(&mut self, feed: Feed) -> u64 {
        match feed {
            Feed::Weather => self.weather.begin(),
            Feed::Calendar => self.calendar.begin(),
            Feed::Photos => self.photos.begin(),
            Feed::OneDrive => self.photo.begin_image(),
        }
    }

    /// Applies a fetch result. Returns `false` when it was stale or its
    /// payload does not belong to `feed`.
    pub fn settle(&mut self, feed: Feed, seq: u64, result: Result<FeedData, String>) -> bool {
        match (feed, result) {
            (Feed::Weather, Ok(FeedData::Weather(w))) => self.weather.settle(seq, Ok(w)),
            (Feed::Weather, Err(e)) => self.weather.settle(seq, Err(e)),
            (Feed::Calendar, Ok(FeedData::Calendar(c))) => self.calendar.settle(seq, Ok(c)),
            (Feed::Calendar, Err(e)) => self.calendar.settle(seq, Err(e)),
            (Feed::Photos, Ok(FeedData::Photos(p))) => self.photos.settle(seq, Ok(p)),
            (Feed::Photos, Err(e)) => self.photos.settle(seq, Err(e)),
            (Feed::OneDrive, Ok(FeedData::Image(i))) => self.photo.image_loaded(seq, Ok(i)),
            (Feed::OneDrive, Err(e)) => self.photo.image_loaded(seq, Err(e)),
            (feed, Ok(data)) => {
                tracing::warn!(?feed, ?data, "payload does not match feed");
                false
            }
        }
    }

    /// Clears state owned by a widget that unmounted.
    pub fn unmount(&mut self, id: &str) {
        if id == CLOCK_ID {
            self.clock = None;
        }
        match Feed::for_widget(id) {
            Some(Feed::Weather) => self.weather.reset(),
            Some(Feed::Calendar) => self.calendar.reset(),
            Some(Feed::Photos) => self.photos.reset(),
            Some(Feed::OneDrive) => self.photo.invalidate(),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::Remote;

    fn weather() -> Weather {
        Weather {
            temperature: 18.0,
            condition: "clear sky".to_string(),
        }
    }

    #[test]
    fn test_feed_widget_ids() {
        assert_eq!(Feed::for_widget("weather"), Some(Feed::Weather));
        assert_eq!(Feed::for_widget("photo"), Some(Feed::OneDrive));
        assert_eq!(Feed::for_widget("photos"), Some(Feed::Photos));
        assert_eq!(Feed::for_widget("clock"), None);
    }

    #[test]
    fn test_settle_routes_payload() {
        let mut feeds = Feeds::default();
        let seq = feeds.begin(Feed::Weather);
        assert!(feeds.settle(Feed::Weather, seq, Ok(FeedData::Weather(weather()))));
        assert_eq!(feeds.weather.state().ready(), Some(&weather()));
    }

    #[test]
    fn test_mismatched_payload_is_rejected() {
        let mut feeds = Feeds::default();
        let seq = feeds.begin(Feed::Calendar);
        assert!(!feeds.settle(Feed::Calendar, seq, Ok(FeedData::Weather(weather()))));
        assert!(feeds.calendar.state().is_loading());
    }

    #[test]
    fn test_error_becomes_failed_state() {
        let mut feeds = Feeds::default();
        let seq = feeds.begin(Feed::Photos);
        feeds.settle(Feed::Photos, seq, Err("HTTP 500".to_string()));
        assert_eq!(feeds.photos.state(), &Remote::Failed("HTTP 500".to_string()));
    }

    #[test]
    fn test_unmount_resets_widget_state() {
        let mut feeds = Feeds::default();
        feeds.clock = NaiveTime::from_hms_opt(9, 5, 3);
        let seq = feeds.begin(Feed::Weather);
        feeds.unmount("weather");
        assert!(!feeds.settle(Feed::Weather, seq, Ok(FeedData::Weather(weather()))));
        feeds.unmount("clock");
        assert!(feeds.clock.is_none());
    }
}
