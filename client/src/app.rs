use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pixel_debate_shared::analysis::ANALYSIS_FAILED_ALERT;
use pixel_debate_shared::{Room, SessionUpdate, Side, SyncMessage, CHANNEL_NAME};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, MouseEvent, PageTransitionEvent, TouchEvent};

use crate::analysis::AnalysisClient;
use crate::canvas::CanvasSurface;
use crate::channel::BroadcastTransport;
use crate::dom::{mouse_point, set_text, touch_point};
use crate::net::analysis_url;
use crate::palette::{color_from_event, preset_from_event, render_presets};
use crate::state::{AnalysisPhase, App, Ui};

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let ui = Ui::lookup(&document)?;
    let surface = CanvasSurface::new(ui.canvas.clone())?;
    let transport = BroadcastTransport::open(CHANNEL_NAME)?;
    let room = Rc::new(RefCell::new(Room::new(surface, transport)));
    Room::attach(&room);

    let app = Rc::new(App {
        analysis: AnalysisClient::new(analysis_url(&window)?),
        window,
        document,
        ui,
        room,
        analysis_phase: Cell::new(AnalysisPhase::Idle),
        editing_topics: Cell::new(false),
    });

    {
        // runs after the room has applied the remote topics
        let weak = Rc::downgrade(&app);
        app.room
            .borrow()
            .synchronizer()
            .subscribe(Box::new(move |message: SyncMessage| {
                if let (SyncMessage::UpdateSession(_), Some(app)) = (&message, weak.upgrade()) {
                    app.refresh_topics();
                }
            }));
    }

    render_presets(&app.document, &app.ui.presets);
    app.refresh_topics();
    app.set_editing_topics(false);
    app.set_analysis_phase(AnalysisPhase::Idle);

    wire_lobby(&app)?;
    wire_canvas(&app)?;
    wire_toolbar(&app)?;
    wire_report(&app)?;

    {
        let resize_app = app.clone();
        let onresize = Closure::<dyn FnMut()>::new(move || {
            resize_app.fit_canvas();
        });
        app.window
            .add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    {
        let close_app = app.clone();
        let onpagehide =
            Closure::<dyn FnMut(PageTransitionEvent)>::new(move |event: PageTransitionEvent| {
                close_app.room.borrow().page_hidden(event.persisted());
            });
        app.window
            .add_event_listener_with_callback("pagehide", onpagehide.as_ref().unchecked_ref())?;
        onpagehide.forget();
    }

    log::info!("Pixel Debate ready");
    Ok(())
}

fn wire_lobby(app: &Rc<App>) -> Result<(), JsValue> {
    {
        let edit_app = app.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            edit_app.set_editing_topics(!edit_app.editing_topics.get());
        });
        app.ui
            .edit_topics
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let input_app = app.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            let value = input_app.ui.topic_a_input.value();
            input_app
                .room
                .borrow_mut()
                .update_session(SessionUpdate::topic_a(value));
            input_app.refresh_topics();
        });
        app.ui
            .topic_a_input
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let input_app = app.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            let value = input_app.ui.topic_b_input.value();
            input_app
                .room
                .borrow_mut()
                .update_session(SessionUpdate::topic_b(value));
            input_app.refresh_topics();
        });
        app.ui
            .topic_b_input
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let preset_app = app.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(preset) = preset_from_event(&event) else {
                return;
            };
            preset_app
                .room
                .borrow_mut()
                .update_session(SessionUpdate::both(preset.topic_a, preset.topic_b));
            preset_app.refresh_topics();
        });
        app.ui
            .presets
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    for (button, side) in [
        (&app.ui.join_left, Side::Left),
        (&app.ui.join_right, Side::Right),
    ] {
        let join_app = app.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            join_app.enter(side);
        });
        button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}

fn wire_canvas(app: &Rc<App>) -> Result<(), JsValue> {
    let canvas = app.ui.canvas.clone();

    {
        let down_app = app.clone();
        let onmousedown = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let point = mouse_point(&down_app.ui.canvas, &event);
            down_app.room.borrow_mut().pointer_down(point);
        });
        canvas.add_event_listener_with_callback("mousedown", onmousedown.as_ref().unchecked_ref())?;
        onmousedown.forget();
    }

    {
        let move_app = app.clone();
        let onmousemove = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let point = mouse_point(&move_app.ui.canvas, &event);
            move_app.room.borrow_mut().pointer_move(point);
        });
        canvas.add_event_listener_with_callback("mousemove", onmousemove.as_ref().unchecked_ref())?;
        onmousemove.forget();
    }

    {
        let up_app = app.clone();
        let onmouseup = Closure::<dyn FnMut(MouseEvent)>::new(move |_| {
            up_app.room.borrow_mut().pointer_up();
        });
        canvas.add_event_listener_with_callback("mouseup", onmouseup.as_ref().unchecked_ref())?;
        onmouseup.forget();
    }

    {
        let leave_app = app.clone();
        let onmouseleave = Closure::<dyn FnMut(MouseEvent)>::new(move |_| {
            leave_app.room.borrow_mut().pointer_leave();
        });
        canvas
            .add_event_listener_with_callback("mouseleave", onmouseleave.as_ref().unchecked_ref())?;
        onmouseleave.forget();
    }

    {
        let touch_app = app.clone();
        let ontouchstart = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            if let Some(point) = touch_point(&touch_app.ui.canvas, &event) {
                touch_app.room.borrow_mut().pointer_down(point);
            }
        });
        canvas
            .add_event_listener_with_callback("touchstart", ontouchstart.as_ref().unchecked_ref())?;
        ontouchstart.forget();
    }

    {
        let touch_app = app.clone();
        let ontouchmove = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            if let Some(point) = touch_point(&touch_app.ui.canvas, &event) {
                touch_app.room.borrow_mut().pointer_move(point);
            }
        });
        canvas.add_event_listener_with_callback("touchmove", ontouchmove.as_ref().unchecked_ref())?;
        ontouchmove.forget();
    }

    {
        let touch_app = app.clone();
        let ontouchend = Closure::<dyn FnMut(TouchEvent)>::new(move |_| {
            touch_app.room.borrow_mut().pointer_up();
        });
        canvas.add_event_listener_with_callback("touchend", ontouchend.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("touchcancel", ontouchend.as_ref().unchecked_ref())?;
        ontouchend.forget();
    }

    Ok(())
}

fn wire_toolbar(app: &Rc<App>) -> Result<(), JsValue> {
    {
        let palette_app = app.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(color) = color_from_event(&event) else {
                return;
            };
            palette_app.room.borrow_mut().machine_mut().set_color(color);
            palette_app.refresh_brush();
        });
        app.ui
            .palette
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let size_app = app.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            let Ok(width) = size_app.ui.size.value().parse::<f64>() else {
                return;
            };
            size_app.room.borrow_mut().machine_mut().set_width(width);
            let width = size_app.room.borrow().machine().brush().width;
            set_text(&size_app.ui.size_value, &width.to_string());
        });
        app.ui
            .size
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let clear_app = app.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            clear_app.room.borrow_mut().clear();
        });
        app.ui
            .clear
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let reselect_app = app.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            reselect_app.leave();
        });
        app.ui
            .reselect
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let analyze_app = app.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            start_analysis(&analyze_app);
        });
        app.ui
            .analyze
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}

fn wire_report(app: &Rc<App>) -> Result<(), JsValue> {
    for button in [&app.ui.close_report, &app.ui.back_to_canvas] {
        let close_app = app.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            close_app.hide_report();
        });
        button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }
    Ok(())
}

fn start_analysis(app: &Rc<App>) {
    if app.analysis_phase.get() == AnalysisPhase::Running {
        return;
    }
    let (snapshot, session) = {
        let room = app.room.borrow();
        (room.surface().snapshot_data_uri(), room.session().clone())
    };
    let snapshot = match snapshot {
        Ok(snapshot) => snapshot,
        Err(error) => {
            log::error!("canvas snapshot failed: {error:?}");
            let _ = app.window.alert_with_message(ANALYSIS_FAILED_ALERT);
            return;
        }
    };
    app.set_analysis_phase(AnalysisPhase::Running);
    let app = app.clone();
    spawn_local(async move {
        match app
            .analysis
            .analyze(&snapshot, &session.topic_a, &session.topic_b)
            .await
        {
            Ok(text) => app.show_report(&text),
            Err(error) => {
                log::error!("analysis failed: {error}");
                let _ = app.window.alert_with_message(ANALYSIS_FAILED_ALERT);
            }
        }
        app.set_analysis_phase(AnalysisPhase::Idle);
    });
}
