//! Domain controls layered over [`MasonDocument`].

use axum::http::Method;

use crate::constants::{AREA_PROFILE, EVENT_PROFILE, LINK_RELATIONS_URL, NAMESPACE};
use crate::models::{Area, Event};
use crate::schema::{get_schema, paginator_schema, Resource};
use crate::utils::mason::{Control, MasonDocument};
use crate::utils::urls;

pub trait NearbyControls {
    fn add_nearby_namespace(&mut self);

    fn add_control_add_area(&mut self);
    fn add_control_add_event(&mut self);
    fn add_control_edit_area(&mut self, area: &str);
    fn add_control_edit_event(&mut self, event: &str);
    fn add_control_delete_area(&mut self, area: &str);
    fn add_control_delete_event(&mut self, event: &str);

    fn add_control_areas_all(&mut self);
    fn add_control_events_all(&mut self);
    fn add_control_areas_collection(&mut self);

    /// Navigation from an event to the area hosting it.
    fn add_control_area(&mut self, area: &str);
    /// Navigation from an area to the events it hosts.
    fn add_control_events_by_area(&mut self, area: &str);
}

fn nearby(rel: &str) -> String {
    format!("{NAMESPACE}:{rel}")
}

impl NearbyControls for MasonDocument {
    fn add_nearby_namespace(&mut self) {
        self.add_namespace(NAMESPACE, LINK_RELATIONS_URL);
    }

    fn add_control_add_area(&mut self) {
        self.add_control(
            nearby("add-area"),
            Control::new(urls::areas())
                .with_method(Method::POST)
                .with_encoding("json")
                .with_title("Add a new area")
                .with_schema(get_schema(Resource::Area)),
        );
    }

    fn add_control_add_event(&mut self) {
        self.add_control(
            nearby("add-event"),
            Control::new(urls::events())
                .with_method(Method::POST)
                .with_encoding("json")
                .with_title("Add a new event")
                .with_schema(get_schema(Resource::Event)),
        );
    }

    fn add_control_edit_area(&mut self, area: &str) {
        self.add_control(
            "edit",
            Control::new(urls::area(area))
                .with_method(Method::PUT)
                .with_encoding("json")
                .with_title("Edit this area")
                .with_schema(get_schema(Resource::Area)),
        );
    }

    fn add_control_edit_event(&mut self, event: &str) {
        self.add_control(
            "edit",
            Control::new(urls::event(event))
                .with_method(Method::PUT)
                .with_encoding("json")
                .with_title("Edit this event")
                .with_schema(get_schema(Resource::Event)),
        );
    }

    fn add_control_delete_area(&mut self, area: &str) {
        self.add_control(
            nearby("delete"),
            Control::new(urls::area(area))
                .with_method(Method::DELETE)
                .with_title("Delete this area"),
        );
    }

    fn add_control_delete_event(&mut self, event: &str) {
        self.add_control(
            nearby("delete"),
            Control::new(urls::event(event))
                .with_method(Method::DELETE)
                .with_title("Delete this event"),
        );
    }

    fn add_control_areas_all(&mut self) {
        self.add_control(
            nearby("areas-all"),
            Control::new(urls::areas()).with_title("All areas"),
        );
    }

    fn add_control_events_all(&mut self) {
        self.add_control(
            nearby("events-all"),
            Control::new(urls::events()).with_title("All events"),
        );
    }

    fn add_control_areas_collection(&mut self) {
        self.add_control(
            nearby("areas-collection"),
            Control::new(format!("{}?start={{index}}", urls::areas()))
                .href_template()
                .with_schema(paginator_schema()),
        );
    }

    fn add_control_area(&mut self, area: &str) {
        self.add_control(
            nearby("area"),
            Control::new(urls::area(area)).with_title("Area hosting this event"),
        );
    }

    fn add_control_events_by_area(&mut self, area: &str) {
        self.add_control(
            nearby("events-by-area"),
            Control::new(urls::events_by_area(area)).with_title("Events in this area"),
        );
    }
}

/// Shallow list-view entry for an area: name plus self and profile links.
pub fn area_summary(area: &Area) -> MasonDocument {
    let mut item = MasonDocument::new().with_field("name", area.name.as_str());
    item.add_control("self", Control::new(urls::area(&area.name)));
    item.add_control("profile", Control::new(AREA_PROFILE));
    item
}

/// Shallow list-view entry for an event.
pub fn event_summary(event: &Event) -> MasonDocument {
    let mut item = MasonDocument::new().with_field("name", event.name.as_str());
    item.add_control("self", Control::new(urls::event(&event.name)));
    item.add_control("profile", Control::new(EVENT_PROFILE));
    item
}
