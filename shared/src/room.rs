//! The coordinating component of one drawing context.
//!
//! A [`Room`] owns everything a context mutates: the surface, the renderer's
//! pen positions, the session topics, the drawing machine and the
//! synchronizer. Local effects are applied first and then published.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::boundary::Boundary;
use crate::drawing::{DrawPhase, DrawingMachine};
use crate::render::{StrokeRenderer, Surface};
use crate::session::{SessionState, SessionUpdate};
use crate::sync::{Subscription, Synchronizer, Transport};
use crate::{Point, Side, StrokeSegment, SyncMessage};

pub struct Room<S: Surface, T: Transport> {
    surface: S,
    renderer: StrokeRenderer,
    session: SessionState,
    machine: DrawingMachine,
    sync: Synchronizer<T>,
}

impl<S: Surface, T: Transport> Room<S, T> {
    pub fn new(surface: S, transport: T) -> Self {
        Self::with_boundary(surface, transport, Boundary::default())
    }

    pub fn with_boundary(mut surface: S, transport: T, boundary: Boundary) -> Self {
        let mut renderer = StrokeRenderer::new();
        renderer.reset(&mut surface);
        Self {
            surface,
            renderer,
            session: SessionState::default(),
            machine: DrawingMachine::new(boundary),
            sync: Synchronizer::new(transport),
        }
    }

    /// Subscribes `room` to its own transport. The handler only keeps a weak
    /// reference, so dropping the room ends delivery.
    pub fn attach(room: &Rc<RefCell<Self>>) -> Subscription
    where
        S: 'static,
        T: 'static,
    {
        let weak: Weak<RefCell<Self>> = Rc::downgrade(room);
        let handler = Box::new(move |message: SyncMessage| {
            let Some(room) = weak.upgrade() else {
                return;
            };
            match room.try_borrow_mut() {
                Ok(mut room) => room.receive(message),
                Err(_) => debug!(kind = message.kind(), "room busy, remote message skipped"),
            };
        });
        room.borrow().sync.subscribe(handler)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn machine(&self) -> &DrawingMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut DrawingMachine {
        &mut self.machine
    }

    pub fn synchronizer(&self) -> &Synchronizer<T> {
        &self.sync
    }

    pub fn side(&self) -> Option<Side> {
        self.machine.side()
    }

    pub fn phase(&self) -> DrawPhase {
        self.machine.phase()
    }

    /// Joins a side. The local canvas starts over; nothing is broadcast.
    pub fn enter(&mut self, side: Side) {
        self.machine.select_side(side);
        self.renderer.reset(&mut self.surface);
    }

    pub fn reselect(&mut self) {
        self.machine.reselect();
    }

    /// Re-establishes the blank canvas after the surface changed size.
    pub fn redraw_blank(&mut self) {
        self.renderer.reset(&mut self.surface);
    }

    pub fn pointer_down(&mut self, point: Point) -> Option<StrokeSegment> {
        let segment = self.machine.pointer_down(point, self.surface.width())?;
        self.draw_local(&segment);
        Some(segment)
    }

    pub fn pointer_move(&mut self, point: Point) -> Option<StrokeSegment> {
        let segment = self.machine.pointer_move(point, self.surface.width())?;
        self.draw_local(&segment);
        Some(segment)
    }

    pub fn pointer_up(&mut self) {
        self.machine.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.machine.pointer_leave();
    }

    fn draw_local(&mut self, segment: &StrokeSegment) {
        self.renderer.apply(&mut self.surface, segment);
        self.sync.publish(&SyncMessage::Draw(segment.clone()));
    }

    pub fn clear(&mut self) {
        self.renderer.reset(&mut self.surface);
        self.sync.publish(&SyncMessage::ClearCanvas);
    }

    pub fn update_session(&mut self, update: SessionUpdate) -> &SessionState {
        self.session.merge(update);
        self.sync
            .publish(&SyncMessage::UpdateSession(self.session.clone()));
        &self.session
    }

    /// Applies a message that arrived from another context.
    pub fn receive(&mut self, message: SyncMessage) {
        match message {
            SyncMessage::Draw(segment) => self.renderer.apply(&mut self.surface, &segment),
            SyncMessage::UpdateSession(session) => {
                if session.id != self.session.id {
                    debug!(remote = %session.id, local = %self.session.id, "session id differs");
                }
                self.session.replace_topics(session);
            }
            SyncMessage::ClearCanvas => self.renderer.reset(&mut self.surface),
        }
    }

    pub fn close(&self) {
        self.sync.close();
    }

    /// The page is being hidden. A page kept in the back/forward cache
    /// (`persisted`) keeps its channel and resumes in sync when shown again;
    /// an unloading page closes it.
    pub fn page_hidden(&self, persisted: bool) {
        if persisted {
            debug!("page cached, channel kept open");
            return;
        }
        self.close();
    }
}
