// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the SimBox structure describing periodic boundary conditions of a frame.

/// Simulation box of a single trajectory frame.
/// Stored as box vectors in the order used by gro files.
#[derive(Debug, Clone, PartialEq)]
pub struct SimBox {
    pub v1x: f32,
    pub v2y: f32,
    pub v3z: f32,
    pub v1y: f32,
    pub v1z: f32,
    pub v2x: f32,
    pub v2z: f32,
    pub v3x: f32,
    pub v3y: f32,
}

impl From<[f32; 3]> for SimBox {
    /// Construct an orthogonal box from its three lengths.
    fn from(arr: [f32; 3]) -> Self {
        SimBox {
            v1x: arr[0],
            v2y: arr[1],
            v3z: arr[2],
            ..Default::default()
        }
    }
}

impl From<[f32; 9]> for SimBox {
    /// Construct a box from all nine box vector components (gro file order).
    fn from(arr: [f32; 9]) -> Self {
        SimBox {
            v1x: arr[0],
            v2y: arr[1],
            v3z: arr[2],
            v1y: arr[3],
            v1z: arr[4],
            v2x: arr[5],
            v2z: arr[6],
            v3x: arr[7],
            v3y: arr[8],
        }
    }
}

impl Default for SimBox {
    fn default() -> Self {
        SimBox {
            v1x: 0.0,
            v2y: 0.0,
            v3z: 0.0,
            v1y: 0.0,
            v1z: 0.0,
            v2x: 0.0,
            v2z: 0.0,
            v3x: 0.0,
            v3y: 0.0,
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_array3() {
        let simbox = SimBox::from([4.0, 5.0, 6.0]);
        assert_eq!(
            simbox,
            SimBox {
                v1x: 4.0,
                v2y: 5.0,
                v3z: 6.0,
                ..Default::default()
            }
        );
    }

    #[test]
    fn from_array9() {
        let simbox = SimBox::from([3.0, 4.0, 5.0, 0.1, 0.2, 1.0, 0.3, 0.4, 0.5]);

        assert_eq!(simbox.v1x, 3.0);
        assert_eq!(simbox.v2y, 4.0);
        assert_eq!(simbox.v3z, 5.0);
        assert_eq!(simbox.v1y, 0.1);
        assert_eq!(simbox.v1z, 0.2);
        assert_eq!(simbox.v2x, 1.0);
        assert_eq!(simbox.v2z, 0.3);
        assert_eq!(simbox.v3x, 0.4);
        assert_eq!(simbox.v3y, 0.5);
    }

    #[test]
    fn default_is_empty() {
        assert_eq!(SimBox::default(), SimBox::from([0.0; 9]));
    }
}
