//! Canvas program painting a timeline model
//!
//! Curves, markers and both hour-label strips share one canvas (iced bug
//! #3040 breaks stacked canvases).

use doseline_core::{CurveSegment, GroupDrawable, LineStyle, TimelineModel};
use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{Frame, Geometry, LineDash, Path, Program, Stroke, Text};
use iced::{mouse, Color, Point, Rectangle, Theme};

use super::geometry::{smooth_controls, PixelMapper};
use crate::theme::{
    substance_color, with_alpha, TimelineStyle, AREA_ALPHA, BACKGROUND, CURRENT_TIME_COLOR, FADED_ALPHA,
    LABEL_COLOR, RATING_COLOR,
};

const DASH: [f32; 2] = [6.0, 6.0];

/// Canvas program for one timeline
pub struct TimelineCanvas<'a> {
    pub model: &'a TimelineModel,
    /// Seconds from the chart start of the "now" line, if it is visible
    pub current_time: Option<f64>,
    pub style: TimelineStyle,
}

impl<'a, Message> Program<Message> for TimelineCanvas<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);

        let style = &self.style;
        let mapper = PixelMapper::new(
            self.model.total_width,
            bounds.width,
            style.height,
            style.line_width,
            style.chart_top(),
        );
        if mapper.pixels_per_sec <= 0.0 {
            log::trace!("Timeline canvas {}px wide, nothing to draw", bounds.width);
            return vec![frame.into_geometry()];
        }

        draw_hour_labels(&mut frame, self.model, &mapper, bounds.width, style);

        for note in &self.model.timed_notes {
            draw_vertical_line(
                &mut frame,
                &mapper,
                mapper.x(note.distance_from_start),
                substance_color(note.color),
                style.marker_line_width,
            );
        }

        for group in &self.model.groups {
            draw_group(&mut frame, group, &mapper, style);
        }

        for rating in &self.model.ratings {
            let x = mapper.x(rating.distance_from_start);
            draw_vertical_line(&mut frame, &mapper, x, RATING_COLOR, style.marker_line_width);
            frame.fill_text(Text {
                content: rating.option.label().to_string(),
                position: Point::new(x + style.marker_line_width, mapper.top + style.label_size / 2.0),
                size: style.label_size.into(),
                color: LABEL_COLOR,
                align_x: Horizontal::Left.into(),
                align_y: Vertical::Center.into(),
                ..Text::default()
            });
        }

        if let Some(seconds) = self.current_time {
            draw_vertical_line(
                &mut frame,
                &mapper,
                mapper.x(seconds),
                CURRENT_TIME_COLOR,
                style.marker_line_width,
            );
        }

        vec![frame.into_geometry()]
    }
}

/// Hour labels in the strips above and below the curves
fn draw_hour_labels(frame: &mut Frame, model: &TimelineModel, mapper: &PixelMapper, width: f32, style: &TimelineStyle) {
    let half_line = style.line_width / 2.0;
    let full_hours = model.axis.get_full_hours(
        mapper.pixels_per_sec as f64,
        (width - half_line) as f64,
        style.min_label_spacing_px as f64,
    );
    let top_y = style.label_strip_height / 2.0;
    let bottom_y = style.total_height() - style.label_strip_height / 2.0;
    for hour in full_hours {
        let x = hour.distance_from_start as f32;
        for y in [top_y, bottom_y] {
            frame.fill_text(Text {
                content: hour.label.clone(),
                position: Point::new(x, y),
                size: style.label_size.into(),
                color: LABEL_COLOR,
                align_x: Horizontal::Center.into(),
                align_y: Vertical::Center.into(),
                ..Text::default()
            });
        }
    }
}

fn draw_vertical_line(frame: &mut Frame, mapper: &PixelMapper, x: f32, color: Color, width: f32) {
    frame.stroke(
        &Path::line(Point::new(x, mapper.top), Point::new(x, mapper.top + mapper.height)),
        Stroke::default().with_color(color).with_width(width),
    );
}

fn draw_group(frame: &mut Frame, group: &GroupDrawable, mapper: &PixelMapper, style: &TimelineStyle) {
    let color = substance_color(group.color);

    for segments in group.normalized_segments() {
        fill_under_solid(frame, &segments, mapper, with_alpha(color, AREA_ALPHA));
        for segment in &segments {
            stroke_segment(frame, segment, mapper, color, style.line_width);
        }
    }

    for marker in group.dose_markers() {
        let center = Point::new(mapper.x(marker.seconds), mapper.baseline());
        frame.fill(&Path::circle(center, style.line_width), color);
    }
}

fn smooth_path(segment: &CurveSegment, mapper: &PixelMapper) -> Path {
    let from = mapper.point(segment.from);
    let to = mapper.point(segment.to);
    let (control_a, control_b) = smooth_controls(from, to);
    Path::new(|builder| {
        builder.move_to(from);
        builder.bezier_curve_to(control_a, control_b, to);
    })
}

fn stroke_segment(frame: &mut Frame, segment: &CurveSegment, mapper: &PixelMapper, color: Color, line_width: f32) {
    let path = smooth_path(segment, mapper);
    let stroke = Stroke::default().with_width(line_width);
    match segment.style {
        LineStyle::Solid => frame.stroke(&path, stroke.with_color(color)),
        LineStyle::Dotted => frame.stroke(
            &path,
            Stroke {
                line_dash: LineDash {
                    segments: &DASH,
                    offset: 0,
                },
                ..stroke.with_color(color)
            },
        ),
        LineStyle::Faded => frame.stroke(&path, stroke.with_color(with_alpha(color, FADED_ALPHA))),
    }
}

/// Translucent area under every run of consecutive solid segments
fn fill_under_solid(frame: &mut Frame, segments: &[CurveSegment], mapper: &PixelMapper, color: Color) {
    let mut run: Vec<&CurveSegment> = Vec::new();
    for segment in segments {
        if segment.style == LineStyle::Solid {
            run.push(segment);
        } else {
            fill_run(frame, &run, mapper, color);
            run.clear();
        }
    }
    fill_run(frame, &run, mapper, color);
}

fn fill_run(frame: &mut Frame, run: &[&CurveSegment], mapper: &PixelMapper, color: Color) {
    let (Some(first), Some(last)) = (run.first(), run.last()) else {
        return;
    };
    let baseline = mapper.baseline();
    let start = mapper.point(first.from);
    let end = mapper.point(last.to);
    let area = Path::new(|builder| {
        builder.move_to(Point::new(start.x, baseline));
        builder.line_to(start);
        for segment in run {
            let from = mapper.point(segment.from);
            let to = mapper.point(segment.to);
            let (control_a, control_b) = smooth_controls(from, to);
            builder.bezier_curve_to(control_a, control_b, to);
        }
        builder.line_to(Point::new(end.x, baseline));
        builder.close();
    });
    frame.fill(&area, color);
}
