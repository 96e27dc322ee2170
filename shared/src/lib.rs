use serde::{Deserialize, Serialize};

pub mod analysis;
pub mod boundary;
pub mod drawing;
pub mod hub;
#[cfg(feature = "raster")]
pub mod raster;
pub mod render;
pub mod room;
pub mod session;
pub mod sync;

pub use boundary::Boundary;
pub use drawing::{Brush, DrawPhase, DrawingMachine};
pub use render::{Pen, StrokeRenderer, Surface};
pub use room::Room;
pub use session::{SessionState, SessionUpdate};
pub use sync::{MessageHandler, Subscription, Synchronizer, Transport, TransportError};

/// Name of the same-origin broadcast channel every context joins.
pub const CHANNEL_NAME: &str = "pixel-debate-channel";
/// Path of the analysis endpoint served next to the client.
pub const ANALYZE_PATH: &str = "/api/analyze";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translates a device position into coordinates local to a surface whose
    /// top-left corner sits at `origin`.
    pub fn relative_to(self, origin: Point) -> Self {
        Self {
            x: self.x - origin.x,
            y: self.y - origin.y,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Left,
    Right,
}

const LEFT_PALETTE: [&str; 4] = ["#f43f5e", "#fb7185", "#fda4af", "#ffffff"];
const RIGHT_PALETTE: [&str; 4] = ["#0ea5e9", "#38bdf8", "#7dd3fc", "#ffffff"];

impl Side {
    pub fn palette(self) -> &'static [&'static str] {
        match self {
            Side::Left => &LEFT_PALETTE,
            Side::Right => &RIGHT_PALETTE,
        }
    }

    pub fn default_color(self) -> &'static str {
        self.palette()[0]
    }

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Start,
    Move,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StrokeSegment {
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub width: f64,
    pub side: Side,
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    pub id: String,
}

impl StrokeSegment {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum SyncMessage {
    #[serde(rename = "DRAW")]
    Draw(StrokeSegment),
    #[serde(rename = "UPDATE_SESSION")]
    UpdateSession(SessionState),
    #[serde(rename = "CLEAR_CANVAS")]
    ClearCanvas,
}

impl SyncMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            SyncMessage::Draw(_) => "DRAW",
            SyncMessage::UpdateSession(_) => "UPDATE_SESSION",
            SyncMessage::ClearCanvas => "CLEAR_CANVAS",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub base64_image: String,
    pub topic_a: String,
    pub topic_b: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnalysisFailure {
    pub error: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopicPreset {
    pub topic_a: &'static str,
    pub topic_b: &'static str,
}

pub const PRESET_TOPICS: [TopicPreset; 5] = [
    TopicPreset {
        topic_a: "AI as a Tool",
        topic_b: "AI as a Threat",
    },
    TopicPreset {
        topic_a: "Remote Work",
        topic_b: "Office Culture",
    },
    TopicPreset {
        topic_a: "Privacy First",
        topic_b: "Total Security",
    },
    TopicPreset {
        topic_a: "Marvel Universe",
        topic_b: "DC Universe",
    },
    TopicPreset {
        topic_a: "Web3 Future",
        topic_b: "Traditional Finance",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_message_wire_shape() {
        let message = SyncMessage::Draw(StrokeSegment {
            x: 10.0,
            y: 20.0,
            color: "#f43f5e".into(),
            width: 4.0,
            side: Side::Left,
            kind: SegmentKind::Start,
            id: "abc".into(),
        });
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "DRAW");
        assert_eq!(value["data"]["side"], "LEFT");
        assert_eq!(value["data"]["type"], "start");
        assert_eq!(value["data"]["width"], 4.0);
    }

    #[test]
    fn test_clear_message_has_no_data() {
        let json = serde_json::to_string(&SyncMessage::ClearCanvas).unwrap();
        assert_eq!(json, r#"{"type":"CLEAR_CANVAS"}"#);
        let parsed: SyncMessage = serde_json::from_str(r#"{"type":"CLEAR_CANVAS"}"#).unwrap();
        assert_eq!(parsed, SyncMessage::ClearCanvas);
    }

    #[test]
    fn test_session_message_uses_camel_case() {
        let json = r#"{"type":"UPDATE_SESSION","data":{"topicA":"Cats","topicB":"Dogs","id":"global-debate"}}"#;
        let parsed: SyncMessage = serde_json::from_str(json).unwrap();
        match parsed {
            SyncMessage::UpdateSession(session) => {
                assert_eq!(session.topic_a, "Cats");
                assert_eq!(session.topic_b, "Dogs");
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_relative_to_subtracts_origin() {
        let local = Point::new(130.0, 95.0).relative_to(Point::new(30.0, 15.0));
        assert_eq!(local, Point::new(100.0, 80.0));
    }

    #[test]
    fn test_side_palettes() {
        assert_eq!(Side::Left.default_color(), "#f43f5e");
        assert_eq!(Side::Right.default_color(), "#0ea5e9");
        assert_eq!(Side::Right.palette().len(), 4);
    }

    #[test]
    fn test_analysis_request_field_names() {
        let request = AnalysisRequest {
            base64_image: "data:image/png;base64,AAAA".into(),
            topic_a: "A".into(),
            topic_b: "B".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("base64Image").is_some());
        assert!(value.get("topicA").is_some());
    }
}
