// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A slider: a composite of a spectrum and a thumb.
//!
//! Pressing the spectrum (or the thumb, which redirects to it) sets the value
//! from the pointer position. Left and Right step the value while the slider
//! has focus. The value lives in a `representing` memory store.

use std::rc::Rc;

use alloy_component::{
    Behaviour, ComponentId, ComponentSpec, Composite, EventKind, PartError, PartSpec, PartType,
    RawEvent, SimulatedEvent, System, handler,
};
use alloy_keying::{KeyHandler, keying};
use alloy_schema::field::{defaulted_of, option_of};
use alloy_schema::{Struct, Value, handle_of, number};

use crate::behaviours::focusing::focusing;
use crate::behaviours::representing::{self, representing};
use crate::hooks::ValueSetter;

/// Behaviour name.
pub const SLIDER: &str = "slider";
/// Class of the slider element.
pub const SLIDER_CLASS: &str = "alloy-slider";
/// Class added to the spectrum part.
pub const SPECTRUM_CLASS: &str = "alloy-slider-spectrum";
/// Class added to the thumb part.
pub const THUMB_CLASS: &str = "alloy-slider-thumb";

/// What to build with [`slider`].
#[derive(Clone, Debug)]
pub struct SliderConfig {
    /// Lowest value.
    pub min: f64,
    /// Highest value.
    pub max: f64,
    /// Values snap to `min + k * step`.
    pub step: f64,
    /// Width of the spectrum, in the units of pointer positions.
    pub width: f64,
    /// Starting value.
    pub initial: f64,
    /// Runs after every change of value.
    pub on_change: Option<ValueSetter>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
            width: 100.0,
            initial: 0.0,
            on_change: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Range {
    min: f64,
    max: f64,
    step: f64,
    width: f64,
}

impl Range {
    fn from_struct(config: &Struct) -> Self {
        Self {
            min: config.number("min").unwrap_or(0.0),
            max: config.number("max").unwrap_or(100.0),
            step: config.number("step").unwrap_or(1.0),
            width: config.number("width").unwrap_or(100.0),
        }
    }

    fn of(system: &System, component: ComponentId) -> Option<Self> {
        behaviour().config(system, component).map(|c| Self::from_struct(&c))
    }

    fn snap(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max.max(self.min));
        if self.step <= 0.0 {
            return clamped;
        }
        let snapped = self.min + ((clamped - self.min) / self.step).round() * self.step;
        snapped.min(self.max)
    }

    fn at(&self, x: f64) -> f64 {
        let ratio = if self.width > 0.0 {
            (x / self.width).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.snap(self.min + ratio * (self.max - self.min))
    }

    fn percent(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            0.0
        } else {
            (value - self.min) / span * 100.0
        }
    }
}

fn define() -> Rc<Behaviour> {
    Behaviour::define(SLIDER)
        .fields(vec![
            defaulted_of("min", Value::from(0.0), number()),
            defaulted_of("max", Value::from(100.0), number()),
            defaulted_of("step", Value::from(1.0), number()),
            defaulted_of("width", Value::from(100.0), number()),
            option_of("on_change", handle_of::<ValueSetter>()),
        ])
        .build()
}

thread_local! {
    static BEHAVIOUR: Rc<Behaviour> = define();
}

fn behaviour() -> Rc<Behaviour> {
    BEHAVIOUR.with(Rc::clone)
}

fn parts() -> Rc<Composite> {
    Composite::new(
        SLIDER,
        vec![
            PartType::required("spectrum").overrides(|_, spec| spec.class(SPECTRUM_CLASS)),
            PartType::required("thumb").overrides(|_, spec| spec.class(THUMB_CLASS)),
        ],
    )
}

/// Move the thumb and the aria attributes to the stored value.
fn refresh(system: &mut System, slider: ComponentId, parts: &Composite) {
    let (Some(range), Some(value)) = (Range::of(system, slider), value(system, slider)) else {
        return;
    };
    let text = value.to_string();
    system
        .doc_mut()
        .set_attr(slider.element(), "aria-valuenow", &text);
    if let Some(thumb) = parts.get_part(system, "thumb") {
        let left = format!("{}%", range.percent(value));
        system.doc_mut().set_style(thumb.element(), "left", &left);
    }
}

fn nudge(steps: f64) -> Value {
    KeyHandler::value(move |system, me, _| {
        let range = Range::of(system, me)?;
        let current = value(system, me)?;
        set_value(system, me, current + steps * range.step);
        Some(true)
    })
}

fn on_press(parts: Rc<Composite>) -> impl Fn(&mut System, ComponentId, &mut SimulatedEvent) {
    move |system, me, event| {
        let on_spectrum = parts
            .get_part(system, "spectrum")
            .is_some_and(|s| s.element() == event.target());
        let &RawEvent::Pointer { x, .. } = event.raw() else {
            return;
        };
        if !on_spectrum {
            return;
        }
        if let Some(range) = Range::of(system, me) {
            set_value(system, me, range.at(x));
            event.stop();
        }
    }
}

/// Build a slider from its two parts.
///
/// Fails if a part is missing or invalid.
pub fn slider(
    config: SliderConfig,
    spectrum: PartSpec,
    thumb: PartSpec,
) -> Result<ComponentSpec, PartError> {
    let parts = parts();
    let mut thumb = thumb;
    for kind in [EventKind::MouseDown, EventKind::TouchStart] {
        thumb.spec = thumb
            .spec
            .on(handler::redirect_to_part(kind, parts.clone(), "spectrum"));
    }
    let components = parts.substitute(
        vec![parts.placeholder("spectrum"), parts.placeholder("thumb")],
        vec![("spectrum", spectrum), ("thumb", thumb)],
    )?;

    let refresher = parts.clone();
    let mut settings = vec![
        ("min", Value::from(config.min)),
        ("max", Value::from(config.max)),
        ("step", Value::from(config.step)),
        ("width", Value::from(config.width)),
    ];
    if let Some(hook) = config.on_change {
        settings.push(("on_change", hook.into()));
    }
    let store = memory_with_refresh(config.initial, refresher);

    Ok(ComponentSpec::new("div")
        .class(SLIDER_CLASS)
        .attr("role", "slider")
        .attr("aria-valuemin", &config.min.to_string())
        .attr("aria-valuemax", &config.max.to_string())
        .with(&behaviour(), Value::object(settings))
        .with(&representing(), store)
        .with(&focusing(), Value::empty_object())
        .with(
            &keying(),
            Value::object([
                ("mode", Value::from("special")),
                ("on_left", nudge(-1.0)),
                ("on_right", nudge(1.0)),
            ]),
        )
        .on(handler::run(EventKind::MouseDown, on_press(parts.clone())))
        .on(handler::run(EventKind::TouchStart, on_press(parts.clone())))
        .on(handler::run_on_init(move |system, me| {
            refresh(system, me, &parts);
        }))
        .children(components))
}

fn memory_with_refresh(initial: f64, parts: Rc<Composite>) -> Value {
    let mut store = representing::memory(initial);
    if let Value::Object(o) = &mut store {
        o.insert(
            "on_set_value".to_owned(),
            ValueSetter::value(move |system, me, _| refresh(system, me, &parts)),
        );
    }
    store
}

/// The slider's value.
pub fn value(system: &System, slider: ComponentId) -> Option<f64> {
    representing::get_value(system, slider)?.as_f64()
}

/// Set the value, snapped into range, and run `on_change`.
pub fn set_value(system: &mut System, slider: ComponentId, value: f64) {
    let Some(config) = behaviour().config(system, slider) else {
        return;
    };
    let snapped = Range::from_struct(&config).snap(value);
    representing::set_value(system, slider, Value::from(snapped));
    if let Some(hook) = config.handle::<ValueSetter>("on_change") {
        hook.call(system, slider, &Value::from(snapped));
    }
}
