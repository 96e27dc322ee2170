use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pixel_debate_shared::{Room, Side, Surface};
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement, Window,
};

use crate::analysis::AnalysisClient;
use crate::canvas::CanvasSurface;
use crate::channel::BroadcastTransport;
use crate::dom::{get_element, set_busy, set_text, set_visible, window_size};
use crate::palette::render_palette;
use crate::report::render_report;

pub type ClientRoom = Room<CanvasSurface, BroadcastTransport>;

pub const ANALYZE_LABEL: &str = "ANALYZE DEBATE";
pub const ANALYZING_LABEL: &str = "ANALYZING...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisPhase {
    Idle,
    Running,
}

/// Handles to every element the app touches.
pub struct Ui {
    pub lobby: HtmlElement,
    pub lobby_topic_a: Element,
    pub lobby_topic_b: Element,
    pub edit_topics: HtmlButtonElement,
    pub topic_editor: HtmlElement,
    pub topic_summary: HtmlElement,
    pub topic_a_input: HtmlInputElement,
    pub topic_b_input: HtmlInputElement,
    pub presets: HtmlElement,
    pub join_left: HtmlButtonElement,
    pub join_right: HtmlButtonElement,
    pub board: HtmlElement,
    pub canvas: HtmlCanvasElement,
    pub hud_topic_a: Element,
    pub hud_topic_b: Element,
    pub side_badge: HtmlElement,
    pub palette: HtmlElement,
    pub size: HtmlInputElement,
    pub size_value: Element,
    pub clear: HtmlButtonElement,
    pub analyze: HtmlButtonElement,
    pub reselect: HtmlButtonElement,
    pub modal: HtmlElement,
    pub report: HtmlElement,
    pub close_report: HtmlButtonElement,
    pub back_to_canvas: HtmlButtonElement,
}

impl Ui {
    pub fn lookup(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            lobby: get_element(document, "lobby")?,
            lobby_topic_a: get_element(document, "topicA")?,
            lobby_topic_b: get_element(document, "topicB")?,
            edit_topics: get_element(document, "editTopics")?,
            topic_editor: get_element(document, "topicEditor")?,
            topic_summary: get_element(document, "topicSummary")?,
            topic_a_input: get_element(document, "topicAInput")?,
            topic_b_input: get_element(document, "topicBInput")?,
            presets: get_element(document, "presets")?,
            join_left: get_element(document, "joinLeft")?,
            join_right: get_element(document, "joinRight")?,
            board: get_element(document, "boardView")?,
            canvas: get_element(document, "canvas")?,
            hud_topic_a: get_element(document, "hudTopicA")?,
            hud_topic_b: get_element(document, "hudTopicB")?,
            side_badge: get_element(document, "sideBadge")?,
            palette: get_element(document, "palette")?,
            size: get_element(document, "size")?,
            size_value: get_element(document, "sizeValue")?,
            clear: get_element(document, "clear")?,
            analyze: get_element(document, "analyze")?,
            reselect: get_element(document, "reselect")?,
            modal: get_element(document, "analysisModal")?,
            report: get_element(document, "analysisBody")?,
            close_report: get_element(document, "closeAnalysis")?,
            back_to_canvas: get_element(document, "backToCanvas")?,
        })
    }
}

pub struct App {
    pub window: Window,
    pub document: Document,
    pub ui: Ui,
    pub room: Rc<RefCell<ClientRoom>>,
    pub analysis: AnalysisClient,
    pub analysis_phase: Cell<AnalysisPhase>,
    pub editing_topics: Cell<bool>,
}

impl App {
    /// Writes the session topics into the lobby, the HUD and the editor.
    pub fn refresh_topics(&self) {
        let room = self.room.borrow();
        let session = room.session();
        set_text(&self.ui.lobby_topic_a, &session.topic_a);
        set_text(&self.ui.lobby_topic_b, &session.topic_b);
        set_text(&self.ui.hud_topic_a, &session.topic_a);
        set_text(&self.ui.hud_topic_b, &session.topic_b);
        // rewriting an unchanged value would move the caret
        if self.ui.topic_a_input.value() != session.topic_a {
            self.ui.topic_a_input.set_value(&session.topic_a);
        }
        if self.ui.topic_b_input.value() != session.topic_b {
            self.ui.topic_b_input.set_value(&session.topic_b);
        }
    }

    pub fn set_editing_topics(&self, editing: bool) {
        self.editing_topics.set(editing);
        set_visible(&self.ui.topic_editor, editing);
        set_visible(&self.ui.topic_summary, !editing);
        self.ui
            .edit_topics
            .set_text_content(Some(if editing { "Done" } else { "Customize" }));
    }

    pub fn refresh_brush(&self) {
        let room = self.room.borrow();
        let Some(side) = room.side() else {
            return;
        };
        let brush = room.machine().brush();
        render_palette(&self.document, &self.ui.palette, side.palette(), &brush.color);
        self.ui.size.set_value(&brush.width.to_string());
        set_text(&self.ui.size_value, &brush.width.to_string());
    }

    pub fn enter(&self, side: Side) {
        {
            let mut room = self.room.borrow_mut();
            let (width, height) = window_size(&self.window);
            room.surface_mut().resize(width, height);
            room.enter(side);
            log::info!(
                "joined {side:?} on a {}x{} canvas",
                room.surface().width(),
                room.surface().height()
            );
        }
        let _ = self
            .ui
            .side_badge
            .set_attribute("data-side", if side == Side::Left { "left" } else { "right" });
        self.refresh_brush();
        self.refresh_topics();
        set_visible(&self.ui.lobby, false);
        set_visible(&self.ui.board, true);
    }

    pub fn leave(&self) {
        self.room.borrow_mut().reselect();
        set_visible(&self.ui.board, false);
        set_visible(&self.ui.modal, false);
        set_visible(&self.ui.lobby, true);
    }

    pub fn fit_canvas(&self) {
        let mut room = self.room.borrow_mut();
        if room.side().is_none() {
            return;
        }
        let (width, height) = window_size(&self.window);
        room.surface_mut().resize(width, height);
        room.redraw_blank();
    }

    pub fn set_analysis_phase(&self, phase: AnalysisPhase) {
        self.analysis_phase.set(phase);
        let running = phase == AnalysisPhase::Running;
        set_busy(
            &self.ui.analyze,
            running,
            if running { ANALYZING_LABEL } else { ANALYZE_LABEL },
        );
    }

    pub fn show_report(&self, text: &str) {
        render_report(&self.document, &self.ui.report, text);
        set_visible(&self.ui.modal, true);
    }

    pub fn hide_report(&self) {
        set_visible(&self.ui.modal, false);
    }
}
