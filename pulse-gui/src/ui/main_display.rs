//! # Main Display Module
//!
//! Builds the whole Pulse view: the large BPM readout, the tap surface,
//! the age picker with its custom entry, and the quit control.

use iced::widget::{Space, button, column, container, row, text, text_input};
use iced::{Alignment, Color, Element, Length};
use pulse_core::Readout;
use pulse_core::zones::Zone;

/// Text shown while no estimate exists.
const PLACEHOLDER: &str = "HR";

/// Creates the complete main application view.
pub fn create_main_view(data: &crate::AppDisplayData) -> Element<'static, crate::Message> {
    let title = text("Pulse").size(24);

    let readout = create_readout(data);
    let status = create_status_line(data);
    let tap_button = create_tap_button();
    let age_section = create_age_section(data);

    let quit_button = button(text("Quit").size(14))
        .padding([6, 10])
        .on_press(crate::Message::Exit);

    let content = column![
        title,
        Space::with_height(10),
        readout,
        status,
        Space::with_height(15),
        tap_button,
        Space::with_height(25),
        age_section,
        Space::with_height(20),
        container(quit_button).center_x(Length::Fill),
    ]
    .spacing(5)
    .align_x(Alignment::Center)
    .padding(20);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// The large readout, tinted by zone while a numeric estimate is shown.
fn create_readout(data: &crate::AppDisplayData) -> Element<'static, crate::Message> {
    let label = match data.readout {
        Readout::Placeholder => PLACEHOLDER.to_string(),
        Readout::Bpm(bpm) => bpm.to_string(),
        Readout::Blank => " ".to_string(),
    };

    let mut readout = text(label).size(64);
    if let Some(zone) = data.zone {
        readout = readout.color(zone_color(zone));
    }

    container(readout)
        .height(Length::Fixed(90.0))
        .center_x(Length::Fill)
        .into()
}

fn create_status_line(data: &crate::AppDisplayData) -> Element<'static, crate::Message> {
    let status = if data.measuring && data.tap_count < 2 {
        "keep tapping".to_string()
    } else if data.measuring {
        format!("{} taps", data.tap_count)
    } else {
        "tap along with your pulse".to_string()
    };

    text(status).size(14).color([0.7, 0.7, 0.7]).into()
}

fn create_tap_button() -> Element<'static, crate::Message> {
    button(text("Tap").size(20).width(Length::Fill))
        .padding([12, 20])
        .width(Length::Fill)
        .style(|_theme, _status| {
            use iced::widget::button;
            button::Style {
                background: Some(iced::Background::Color(Color::from_rgb(0.25, 0.35, 0.55))),
                text_color: Color::WHITE,
                ..button::Style::default()
            }
        })
        .on_press(crate::Message::TapPressed)
        .into()
}

/// The age picker: current age and max heart rate, preset buttons, the
/// custom entry field, and any validation notice.
fn create_age_section(data: &crate::AppDisplayData) -> Element<'static, crate::Message> {
    let header = text(format!(
        "Age: {}   Max HR: {}",
        data.age, data.max_heart_rate
    ))
    .size(16);

    let mut preset_rows = column![].spacing(8);
    for chunk in crate::AGE_PRESETS.chunks(6) {
        let mut presets = row![].spacing(8);
        for &age in chunk {
            presets = presets.push(make_preset_button(age, age == data.age));
        }
        preset_rows = preset_rows.push(presets);
    }

    let custom_entry = row![
        text_input("e.g. 35", &data.age_input)
            .on_input(crate::Message::AgeInputChanged)
            .on_submit(crate::Message::AgeInputSubmitted)
            .width(Length::Fixed(120.0)),
        button(text("Set").size(14))
            .padding([6, 10])
            .on_press(crate::Message::AgeInputSubmitted),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let mut section = column![
        header,
        Space::with_height(8),
        preset_rows,
        Space::with_height(8),
        custom_entry,
    ]
    .spacing(5)
    .align_x(Alignment::Center);

    if let Some(notice) = &data.age_notice {
        section = section.push(Space::with_height(5));
        section = section.push(
            text(notice.clone())
                .size(14)
                .color(Color::from_rgb(0.8, 0.2, 0.2)),
        );
    }

    section.into()
}

/// A single preset age button, highlighted when it matches the stored age.
fn make_preset_button(age: u8, selected: bool) -> Element<'static, crate::Message> {
    let mut preset = button(text(age.to_string()).size(14)).padding([6, 10]);

    if selected {
        preset = preset.style(|_theme, _status| {
            use iced::widget::button;
            button::Style {
                background: Some(iced::Background::Color(Color::from_rgb(0.25, 0.35, 0.55))),
                text_color: Color::WHITE,
                ..button::Style::default()
            }
        });
    }

    preset.on_press(crate::Message::AgePicked(age)).into()
}

/// Readout tint for each heart-rate zone.
fn zone_color(zone: Zone) -> Color {
    match zone {
        Zone::Low => Color::from_rgb(0.2, 0.8, 0.2),      // Green
        Zone::Moderate => Color::from_rgb(1.0, 0.84, 0.0), // Gold
        Zone::High => Color::from_rgb(0.8, 0.2, 0.2),      // Red
    }
}
