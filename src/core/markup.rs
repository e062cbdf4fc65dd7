//! XML markup format: a `<Vehicles>` root with one child per vehicle, the
//! child's tag being the vehicle's discriminant.

use std::io::Write;
use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::core::collect_entries;
use crate::domain::model::{
    Engine, Transmission, Vehicle, VehicleKind, Wheel, DEFAULT_BATTERY_CAPACITY,
    DEFAULT_BUS_CAPACITY, DEFAULT_DOUBLE_DECKER, DEFAULT_MOTO_TYPE, DEFAULT_SEATS,
};
use crate::domain::ports::{DecodePolicy, VehicleCodec};
use crate::utils::error::{Result, StoreError};

pub const ROOT_TAG: &str = "Vehicles";

// Fallbacks used when a base node is absent from a vehicle element.
const UNKNOWN_MODEL: &str = "Unknown";
const UNKNOWN_ENGINE_TYPE: &str = "Unknown";
const MISSING_POWER: f64 = 0.0;
const DEFAULT_TRANSMISSION_TYPE: &str = "Manual";
const MISSING_GEARS: i32 = 1;

const TRUE_TEXT: &str = "True";
const FALSE_TEXT: &str = "False";

/// Minimal owned element tree. Attributes are not part of the format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// First descendant matching a `/`-separated path of child tags.
    pub fn find(&self, path: &str) -> Option<&Element> {
        path.split('/').try_fold(self, |node, segment| {
            node.children.iter().find(|child| child.tag == segment)
        })
    }

    /// Text of the node at `path`, or `None` when the node is absent.
    /// A present node without text yields `""`.
    pub fn find_text(&self, path: &str) -> Option<&str> {
        self.find(path).map(|node| node.text.as_str())
    }
}

fn parse_field<T>(node: &Element, path: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(text) = node.find_text(path) else {
        return Ok(None);
    };

    text.trim().parse().map(Some).map_err(|e| {
        StoreError::missing_data(
            format!("<{}>/{}", node.tag, path),
            format!("cannot parse '{}': {}", text, e),
        )
    })
}

fn bool_text(value: bool) -> &'static str {
    if value {
        TRUE_TEXT
    } else {
        FALSE_TEXT
    }
}

pub fn engine_to_element(engine: &Engine) -> Element {
    let mut element = Element::new("engine");
    element.push(Element::with_text("type", engine.engine_type()));
    element.push(Element::with_text("power", engine.power().to_string()));
    element
}

pub fn engine_from_element(element: &Element) -> Result<Engine> {
    let engine_type = element.find_text("type").unwrap_or(UNKNOWN_ENGINE_TYPE);
    let power = parse_field(element, "power")?.unwrap_or(MISSING_POWER);
    Engine::new(engine_type, power)
}

pub fn transmission_to_element(transmission: &Transmission) -> Element {
    let mut element = Element::new("transmission");
    element.push(Element::with_text("type", transmission.transmission_type()));
    element.push(Element::with_text("gears", transmission.gears().to_string()));
    element
}

pub fn transmission_from_element(element: &Element) -> Result<Transmission> {
    let transmission_type = element
        .find_text("type")
        .unwrap_or(DEFAULT_TRANSMISSION_TYPE);
    let gears = parse_field(element, "gears")?.unwrap_or(MISSING_GEARS);
    Transmission::new(transmission_type, gears)
}

pub fn wheel_to_element(wheel: &Wheel) -> Element {
    Element::with_text("wheel", wheel.size().to_string())
}

pub fn wheel_from_element(element: &Element) -> Result<Wheel> {
    let size = element.text.trim().parse::<i32>().map_err(|e| {
        StoreError::missing_data(
            format!("<{}>", element.tag),
            format!("cannot parse wheel size '{}': {}", element.text, e),
        )
    })?;
    Wheel::new(size)
}

pub fn vehicle_to_element(vehicle: &Vehicle) -> Element {
    let mut element = Element::new(vehicle.tag());
    element.push(Element::with_text("model", vehicle.model()));
    element.push(engine_to_element(vehicle.engine()));
    element.push(transmission_to_element(vehicle.transmission()));

    let mut wheels = Element::new("wheels");
    for wheel in vehicle.wheels() {
        wheels.push(wheel_to_element(wheel));
    }
    element.push(wheels);

    match vehicle.kind() {
        VehicleKind::Generic => {}
        VehicleKind::Car { seats } => {
            element.push(Element::with_text("seats", seats.to_string()));
        }
        VehicleKind::ElectricCar {
            seats,
            battery_capacity,
        } => {
            element.push(Element::with_text("seats", seats.to_string()));
            element.push(Element::with_text(
                "battery_capacity",
                battery_capacity.to_string(),
            ));
        }
        VehicleKind::Bus {
            capacity,
            double_decker,
        } => {
            element.push(Element::with_text("capacity", capacity.to_string()));
            element.push(Element::with_text("double_decker", bool_text(*double_decker)));
        }
        VehicleKind::Motorcycle { moto_type } => {
            element.push(Element::with_text("moto_type", moto_type.as_str()));
        }
    }

    element
}

pub fn vehicle_from_element(element: &Element) -> Result<Vehicle> {
    let empty = Element::default();

    let model = element.find_text("model").unwrap_or(UNKNOWN_MODEL);
    let engine = engine_from_element(element.find("engine").unwrap_or(&empty))?;
    let transmission =
        transmission_from_element(element.find("transmission").unwrap_or(&empty))?;

    let wheels = element
        .find("wheels")
        .ok_or_else(|| {
            StoreError::missing_data(format!("<{}>", element.tag), "no <wheels> element")
        })?
        .children
        .iter()
        .map(wheel_from_element)
        .collect::<Result<Vec<_>>>()?;

    let kind = match element.tag.as_str() {
        VehicleKind::CAR_TAG => VehicleKind::Car {
            seats: parse_field(element, "seats")?.unwrap_or(DEFAULT_SEATS),
        },
        VehicleKind::ELECTRIC_CAR_TAG => VehicleKind::ElectricCar {
            seats: parse_field(element, "seats")?.unwrap_or(DEFAULT_SEATS),
            battery_capacity: parse_field(element, "battery_capacity")?
                .unwrap_or(DEFAULT_BATTERY_CAPACITY),
        },
        VehicleKind::BUS_TAG => VehicleKind::Bus {
            capacity: parse_field(element, "capacity")?.unwrap_or(DEFAULT_BUS_CAPACITY),
            // Only the exact text "True" is true; "true", "yes", "" are all false.
            double_decker: element
                .find_text("double_decker")
                .map(|text| text == TRUE_TEXT)
                .unwrap_or(DEFAULT_DOUBLE_DECKER),
        },
        VehicleKind::MOTORCYCLE_TAG => VehicleKind::Motorcycle {
            moto_type: element
                .find_text("moto_type")
                .unwrap_or(DEFAULT_MOTO_TYPE)
                .to_string(),
        },
        _ => VehicleKind::Generic,
    };

    Ok(Vehicle::new(model, engine, transmission, wheels, kind))
}

pub fn write_document(root: &Element) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| StoreError::XmlError(e.into()))?;
    write_element(&mut writer, root)?;

    let mut buffer = writer.into_inner();
    buffer.push(b'\n');
    Ok(buffer)
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let tag = element.tag.as_str();

    if element.children.is_empty() && element.text.is_empty() {
        writer
            .write_event(Event::Empty(BytesStart::new(tag)))
            .map_err(|e| StoreError::XmlError(e.into()))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(|e| StoreError::XmlError(e.into()))?;
    if !element.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&element.text)))
            .map_err(|e| StoreError::XmlError(e.into()))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(|e| StoreError::XmlError(e.into()))?;

    Ok(())
}

pub fn parse_document(data: &[u8]) -> Result<Element> {
    let content = std::str::from_utf8(data)
        .map_err(|e| StoreError::XmlError(quick_xml::Error::NonDecodable(Some(e))))?;

    let mut reader = Reader::from_str(content);
    reader.trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                stack.push(Element::new(String::from_utf8_lossy(e.name().as_ref())));
            }
            Event::Empty(ref e) => {
                let element = Element::new(String::from_utf8_lossy(e.name().as_ref()));
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(mut element) = stack.pop() {
                    // Indentation between child elements is not content.
                    if !element.children.is_empty() && element.text.trim().is_empty() {
                        element.text.clear();
                    }
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(ref e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(StoreError::missing_data(
            "xml document",
            format!("unexpected end of document inside <{}>", stack[stack.len() - 1].tag),
        ));
    }

    root.ok_or_else(|| StoreError::missing_data("xml document", "no root element"))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupCodec {
    policy: DecodePolicy,
}

impl MarkupCodec {
    pub fn new(policy: DecodePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }
}

impl VehicleCodec for MarkupCodec {
    fn format_name(&self) -> &'static str {
        "xml"
    }

    fn encode(&self, vehicles: &[Vehicle]) -> Result<Vec<u8>> {
        let mut root = Element::new(ROOT_TAG);
        for vehicle in vehicles {
            root.push(vehicle_to_element(vehicle));
        }
        write_document(&root)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<Vehicle>> {
        let root = parse_document(data)?;
        tracing::debug!("Decoding {} xml elements under <{}>", root.children.len(), root.tag);

        collect_entries(
            self.format_name(),
            self.policy,
            root.children.iter().map(vehicle_from_element),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus_element(double_decker: Option<&str>) -> Element {
        let mut element = vehicle_to_element(&Vehicle::generic(
            "Routemaster",
            Engine::new("Diesel", 150.0).unwrap(),
            Transmission::new("Manual", 5).unwrap(),
            vec![Wheel::new(20).unwrap(); 4],
        ));
        element.tag = "Bus".to_string();
        if let Some(text) = double_decker {
            element.push(Element::with_text("double_decker", text));
        }
        element
    }

    #[test]
    fn test_value_types_round_trip() {
        let engine = Engine::new("Electric", 0.0001).unwrap();
        assert_eq!(engine_from_element(&engine_to_element(&engine)).unwrap(), engine);

        let transmission = Transmission::new("Automatic", 1).unwrap();
        assert_eq!(
            transmission_from_element(&transmission_to_element(&transmission)).unwrap(),
            transmission
        );

        let wheel = Wheel::new(10).unwrap();
        assert_eq!(wheel_from_element(&wheel_to_element(&wheel)).unwrap(), wheel);
    }

    #[test]
    fn test_double_decker_text_is_case_sensitive() {
        for text in ["False", "false", "", "no", "true", "TRUE"] {
            let vehicle = vehicle_from_element(&bus_element(Some(text))).unwrap();
            assert_eq!(
                vehicle.kind(),
                &VehicleKind::Bus {
                    capacity: 20,
                    double_decker: false
                },
                "text {:?}",
                text
            );
        }

        let vehicle = vehicle_from_element(&bus_element(Some("True"))).unwrap();
        assert_eq!(
            vehicle.kind(),
            &VehicleKind::Bus {
                capacity: 20,
                double_decker: true
            }
        );

        let vehicle = vehicle_from_element(&bus_element(None)).unwrap();
        assert_eq!(
            vehicle.kind(),
            &VehicleKind::Bus {
                capacity: 20,
                double_decker: false
            }
        );
    }

    #[test]
    fn test_missing_wheels_is_missing_data() {
        let mut element = bus_element(None);
        element.children.retain(|child| child.tag != "wheels");
        assert!(matches!(
            vehicle_from_element(&element).unwrap_err(),
            StoreError::MissingData { .. }
        ));
    }

    #[test]
    fn test_base_node_fallbacks() {
        let mut element = Element::new("Car");
        element.push(Element::with_text("model", "Bare"));
        let mut engine = Element::new("engine");
        engine.push(Element::with_text("power", "90"));
        element.push(engine);
        element.push(Element::new("wheels"));

        let vehicle = vehicle_from_element(&element).unwrap();
        assert_eq!(vehicle.engine().engine_type(), "Unknown");
        assert_eq!(vehicle.transmission().transmission_type(), "Manual");
        assert_eq!(vehicle.transmission().gears(), 1);
        assert!(vehicle.wheels().is_empty());
        assert_eq!(vehicle.kind(), &VehicleKind::Car { seats: 4 });

        // Without a power node the engine falls back to 0, which is invalid.
        element.children.retain(|child| child.tag != "engine");
        assert!(matches!(
            vehicle_from_element(&element).unwrap_err(),
            StoreError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_unparsable_number_is_missing_data() {
        let mut element = bus_element(None);
        element.push(Element::with_text("capacity", "many"));
        assert!(matches!(
            vehicle_from_element(&element).unwrap_err(),
            StoreError::MissingData { .. }
        ));
    }

    #[test]
    fn test_document_layout() {
        let vehicle = Vehicle::motorcycle(
            "Ninja",
            Engine::new("Petrol", 75.5).unwrap(),
            Transmission::new("Manual", 6).unwrap(),
            vec![Wheel::new(17).unwrap(), Wheel::new(18).unwrap()],
            "Sport",
        );
        let data = MarkupCodec::default().encode(&[vehicle]).unwrap();
        let text = String::from_utf8(data).unwrap();

        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<Motorcycle>"));
        assert!(text.contains("<power>75.5</power>"));
        assert!(text.contains("<wheel>17</wheel>"));
        assert!(text.contains("<moto_type>Sport</moto_type>"));
        assert!(text.find("<wheels>").unwrap() < text.find("<moto_type>").unwrap());
    }

    #[test]
    fn test_parse_document_tree() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Vehicles>
  <Vehicle><model>A &amp; B</model><wheels><wheel>12</wheel></wheels></Vehicle>
  <Truck/>
</Vehicles>"#;
        let root = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(root.tag, "Vehicles");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.find_text("Vehicle/model"), Some("A & B"));
        assert_eq!(root.find_text("Vehicle/wheels/wheel"), Some("12"));
        assert_eq!(root.find_text("Truck"), Some(""));
        assert_eq!(root.find("Vehicle/engine"), None);
    }

    #[test]
    fn test_parse_document_errors() {
        assert!(matches!(
            parse_document(b"").unwrap_err(),
            StoreError::MissingData { .. }
        ));
        assert!(parse_document(b"<Vehicles><Car></Vehicles>").is_err());
    }

    #[test]
    fn test_non_utf8_document_is_xml_error() {
        let err = MarkupCodec::default()
            .decode(b"\xff\xfe<Vehicles/>")
            .unwrap_err();
        assert!(matches!(err, StoreError::XmlError(_)));
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Storage);
    }

    #[test]
    fn test_defaults_for_absent_variant_fields() {
        let mut electric = bus_element(None);
        electric.tag = "ElectricCar".to_string();
        electric.push(Element::with_text("seats", "5"));
        assert_eq!(
            vehicle_from_element(&electric).unwrap().kind(),
            &VehicleKind::ElectricCar {
                seats: 5,
                battery_capacity: 0.0
            }
        );

        let mut motorcycle = bus_element(None);
        motorcycle.tag = "Motorcycle".to_string();
        assert_eq!(
            vehicle_from_element(&motorcycle).unwrap().kind(),
            &VehicleKind::Motorcycle {
                moto_type: "Unknown".to_string()
            }
        );

        let mut car = bus_element(None);
        car.tag = "ElectricCar".to_string();
        assert_eq!(
            vehicle_from_element(&car).unwrap().kind(),
            &VehicleKind::ElectricCar {
                seats: 4,
                battery_capacity: 0.0
            }
        );
    }
}
