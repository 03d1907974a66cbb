//! This example attaches a widget to an in-memory document, lets the deferred steps run and prints
//! the tiles the map would request.

use std::rc::Rc;

use map_widget::css;
use map_widget::platform::headless::{HeadlessDocument, ManualScheduler};
use map_widget::platform::HostElement;
use map_widget::{MapWidget, WidgetHost};
use map_widget_types::cartesian::Size;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let document = Rc::new(HeadlessDocument::loading());
    let element = document
        .create_element("div")
        .with_attribute("data-map-widget-latitude", "51.505")
        .with_attribute("data-map-widget-longitude", "-0.09")
        .with_attribute("data-map-widget-zoom", "13")
        .with_attribute("data-map-widget-tile-layer", "topo")
        .with_attribute("data-map-widget-grayscale", "true")
        .with_attribute("data-map-widget-marker-offset", "0.66");
    let map = document
        .create_element("div")
        .with_attribute(css::TARGET_ATTRIBUTE, css::TARGET_MAP);
    map.set_client_size(Size::new(640.0, 320.0));
    element.append(&map);
    document.body().append(&element);

    let scheduler = Rc::new(ManualScheduler::new());
    let widget = MapWidget::attach(
        WidgetHost::new(document.clone(), scheduler.clone()),
        element.clone(),
    );
    println!("Before the document is ready: {:?}", widget.state());

    document.finish_loading();
    scheduler.run_pending();
    println!("After layout: {:?}, classes {:?}", widget.state(), element.classes());

    widget.with_surface(|surface| {
        println!("Attribution: {}", surface.attribution().text());
        if let Some(position) = surface.marker_screen_position() {
            println!("Marker at ({:.1}, {:.1})", position.x, position.y);
        }

        match surface.visible_tiles() {
            Ok(tiles) => {
                for tile in tiles {
                    println!("{}", tile.url);
                }
            }
            Err(err) => println!("No tiles: {err}"),
        }
    });

    for pane in map.children() {
        println!("{:?}: filter {:?}", pane.classes(), pane.style("filter"));
    }

    widget.detach();
}
