use pixel_debate_shared::{TopicPreset, PRESET_TOPICS};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlButtonElement, HtmlElement};

pub fn render_palette(document: &Document, palette_el: &HtmlElement, colors: &[&str], selected: &str) {
    palette_el.set_inner_html("");
    for color in colors {
        let Ok(element) = document.create_element("button") else {
            continue;
        };
        let Ok(button) = element.dyn_into::<HtmlButtonElement>() else {
            continue;
        };
        let _ = button.set_attribute("type", "button");
        let _ = button.set_attribute("data-color", color);
        let _ = button.set_attribute("aria-label", &format!("Use color {color}"));
        let active = color.eq_ignore_ascii_case(selected);
        let _ = button.set_attribute("class", if active { "swatch active" } else { "swatch" });
        let _ = button.set_attribute("aria-pressed", if active { "true" } else { "false" });
        let _ = button.style().set_property("background", color);
        let _ = palette_el.append_child(&button);
    }
}

pub fn render_presets(document: &Document, presets_el: &HtmlElement) {
    presets_el.set_inner_html("");
    for (index, preset) in PRESET_TOPICS.iter().enumerate() {
        let Ok(element) = document.create_element("button") else {
            continue;
        };
        let _ = element.set_attribute("type", "button");
        let _ = element.set_attribute("class", "preset");
        let _ = element.set_attribute("data-preset", &index.to_string());
        element.set_text_content(Some(&format!("{} vs {}", preset.topic_a, preset.topic_b)));
        let _ = presets_el.append_child(&element);
    }
}

fn find_attribute(event: &Event, name: &str) -> Option<String> {
    let mut current = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok());
    while let Some(element) = current {
        if let Some(value) = element.get_attribute(name) {
            return Some(value);
        }
        current = element.parent_element();
    }
    None
}

pub fn color_from_event(event: &Event) -> Option<String> {
    find_attribute(event, "data-color")
}

pub fn preset_from_event(event: &Event) -> Option<TopicPreset> {
    let index = find_attribute(event, "data-preset")?.parse::<usize>().ok()?;
    PRESET_TOPICS.get(index).copied()
}
