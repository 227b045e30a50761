//! Vehicle class set

use serde::{Deserialize, Serialize};

/// Vehicle class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleClass {
    Car,
    Truck,
    Bus,
    Motorcycle,
}

impl VehicleClass {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::Car => "car",
            VehicleClass::Truck => "truck",
            VehicleClass::Bus => "bus",
            VehicleClass::Motorcycle => "motorcycle",
        }
    }

    /// Map a model class id onto the vehicle set.
    ///
    /// Ids follow the detection model's label order (car, truck, bus,
    /// motorcycle); anything else is not a vehicle.
    pub fn from_class_id(class_id: u32) -> Option<Self> {
        match class_id {
            0 => Some(VehicleClass::Car),
            1 => Some(VehicleClass::Truck),
            2 => Some(VehicleClass::Bus),
            3 => Some(VehicleClass::Motorcycle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_id_mapping() {
        assert_eq!(VehicleClass::from_class_id(0), Some(VehicleClass::Car));
        assert_eq!(
            VehicleClass::from_class_id(3),
            Some(VehicleClass::Motorcycle)
        );
        assert_eq!(VehicleClass::from_class_id(9), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(VehicleClass::Bus.as_str(), "bus");
    }
}
