//! Mounting a field into the page and running its frame loop
//!
//! The driver and the canvas surface live in one `Rc<RefCell<_>>` shared by
//! the `requestAnimationFrame` callback and the window listeners. Listeners
//! only forward input to the driver; all simulation happens in the frame
//! callback.

use std::cell::RefCell;
use std::rc::Rc;

use nodefield_core::{Driver, Environment, InputEvent, LoopState, Point, Scene};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent,
    TouchEvent, Window,
};

use crate::canvas2d::Canvas2dSurface;
use crate::environment::{random_seed, read_environment, viewport_size};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct State {
    driver: Driver<Box<dyn Scene>>,
    surface: Canvas2dSurface,
    /// Id of the pending animation frame request
    frame_request: Option<i32>,
}

impl State {
    fn dispatch(&mut self, event: InputEvent) {
        self.driver.handle(event, &mut self.surface);
    }
}

/// A registered window listener, kept so it can be removed again
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add(
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        handler: Box<dyn FnMut(Event)>,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(handler);
        let callback = closure.as_ref().unchecked_ref();

        if passive {
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind, callback, &options,
            )?;
        } else {
            target.add_event_listener_with_callback(kind, callback)?;
        }

        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }

    fn remove(self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref())
        {
            tracing::warn!(kind = self.kind, ?err, "failed to remove listener");
        }
    }
}

/// A mounted field; call `destroy` when the host element goes away
#[wasm_bindgen]
pub struct FieldHandle {
    window: Window,
    canvas: HtmlCanvasElement,
    state: Rc<RefCell<State>>,
    frame: FrameCallback,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl FieldHandle {
    /// Scale glow, connection and flow opacity; clamped into [0, 1]
    pub fn set_intensity(&self, value: f64) {
        self.state.borrow_mut().driver.set_intensity(value);
    }

    pub fn intensity(&self) -> f64 {
        self.state.borrow().driver.scene().intensity()
    }

    /// Number of nodes or particles currently simulated
    pub fn entity_count(&self) -> usize {
        self.state.borrow().driver.scene().len()
    }

    /// `true` while the frame loop is scheduling frames
    pub fn is_animating(&self) -> bool {
        self.state.borrow().driver.state() == LoopState::Running
    }

    /// Stop the loop, drop all listeners and remove the canvas
    ///
    /// Safe to call more than once.
    pub fn destroy(&mut self) {
        self.teardown();
    }
}

impl FieldHandle {
    fn start_loop(&self) -> Result<(), JsValue> {
        let window = self.window.clone();
        let state = Rc::clone(&self.state);
        let frame = Rc::clone(&self.frame);

        let callback = Closure::<dyn FnMut()>::new(move || {
            let mut guard = state.borrow_mut();
            let State {
                driver,
                surface,
                frame_request,
            } = &mut *guard;

            *frame_request = None;
            if !driver.on_frame(surface).reschedule() {
                return;
            }

            if let Some(callback) = frame.borrow().as_ref() {
                match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => *frame_request = Some(id),
                    Err(err) => tracing::error!(?err, "requestAnimationFrame failed"),
                }
            }
        });

        let id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())?;
        self.state.borrow_mut().frame_request = Some(id);
        *self.frame.borrow_mut() = Some(callback);
        Ok(())
    }

    fn teardown(&mut self) {
        if !self.state.borrow_mut().driver.destroy() {
            return;
        }

        if let Some(id) = self.state.borrow_mut().frame_request.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                tracing::warn!(?err, "failed to cancel animation frame");
            }
        }
        // Breaks the callback's reference cycle through `frame`
        self.frame.borrow_mut().take();

        for listener in self.listeners.drain(..) {
            listener.remove();
        }
        self.canvas.remove();
        tracing::info!("node field unmounted");
    }
}

impl Drop for FieldHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Create the canvas, build the scene, wire events and start animating
pub(crate) fn mount(
    container: &HtmlElement,
    build: impl FnOnce(Environment, u64) -> Box<dyn Scene>,
) -> Result<FieldHandle, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let env = read_environment(&window);

    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("Failed to create canvas element"))?;
    canvas.set_width(env.viewport_width as u32);
    canvas.set_height(env.viewport_height as u32);
    canvas.set_attribute("aria-hidden", "true")?;
    container.append_child(&canvas)?;

    let surface = Canvas2dSurface::new(canvas.clone()).map_err(|e| JsValue::from_str(&e))?;
    let scene = build(env, random_seed());
    tracing::info!(
        entities = scene.len(),
        width = env.viewport_width,
        height = env.viewport_height,
        reduced_motion = env.prefers_reduced_motion,
        "mounting node field"
    );

    let state = Rc::new(RefCell::new(State {
        driver: Driver::new(scene),
        surface,
        frame_request: None,
    }));

    let mut handle = FieldHandle {
        window: window.clone(),
        canvas,
        state: Rc::clone(&state),
        frame: Rc::new(RefCell::new(None)),
        listeners: Vec::new(),
    };
    // From here on, dropping `handle` on error undoes everything
    handle.listeners = bind_events(&window, &state)?;

    let started = {
        let mut guard = state.borrow_mut();
        let State {
            driver, surface, ..
        } = &mut *guard;
        driver.start(surface, env.prefers_reduced_motion)
    };
    if started == LoopState::Running {
        handle.start_loop()?;
    }

    Ok(handle)
}

fn bind_events(window: &Window, state: &Rc<RefCell<State>>) -> Result<Vec<Listener>, JsValue> {
    let target: &EventTarget = window.as_ref();

    let on_resize: Box<dyn FnMut(Event)> = {
        let state = Rc::clone(state);
        let window = window.clone();
        Box::new(move |_| {
            let (width, height) = viewport_size(&window);
            state
                .borrow_mut()
                .dispatch(InputEvent::Resize { width, height });
        })
    };

    let on_mouse_move: Box<dyn FnMut(Event)> = {
        let state = Rc::clone(state);
        Box::new(move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                let point = Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
                state.borrow_mut().dispatch(InputEvent::PointerMove(point));
            }
        })
    };

    let on_mouse_leave: Box<dyn FnMut(Event)> = {
        let state = Rc::clone(state);
        Box::new(move |_| state.borrow_mut().dispatch(InputEvent::PointerLeave))
    };

    let on_touch_move: Box<dyn FnMut(Event)> = {
        let state = Rc::clone(state);
        Box::new(move |event| {
            let first = event
                .dyn_ref::<TouchEvent>()
                .and_then(|touch| touch.touches().get(0));
            if let Some(touch) = first {
                let point = Point::new(f64::from(touch.client_x()), f64::from(touch.client_y()));
                state.borrow_mut().dispatch(InputEvent::TouchMove(point));
            }
        })
    };

    let on_touch_end: Box<dyn FnMut(Event)> = {
        let state = Rc::clone(state);
        Box::new(move |_| state.borrow_mut().dispatch(InputEvent::TouchEnd))
    };

    let handlers = [
        ("resize", false, on_resize),
        ("mousemove", false, on_mouse_move),
        ("mouseleave", false, on_mouse_leave),
        ("touchmove", true, on_touch_move),
        ("touchend", false, on_touch_end),
    ];

    let mut listeners = Vec::with_capacity(handlers.len());
    for (kind, passive, handler) in handlers {
        match Listener::add(target, kind, passive, handler) {
            Ok(listener) => listeners.push(listener),
            Err(err) => {
                for listener in listeners {
                    listener.remove();
                }
                return Err(err);
            }
        }
    }
    Ok(listeners)
}
