//! The built-in variable catalog

use flow_config::{Catalog, RemovedTable, Value, VariableRef};

use crate::types::VarType;
use crate::variable::Variable;

const UM: &str = "µm";
const NS: &str = "ns";

/// Variables the PDK and its standard cell libraries provide.
pub fn technology_variables() -> Vec<Variable> {
    use VarType::*;
    let str_list = || VarType::list(Str);

    vec![
        Variable::new("PDK", Str, "Specifies the process design kit (PDK)."),
        Variable::new("STD_CELL_LIBRARY", Str, "Specifies the default standard cell library to be used under the specified PDK."),
        Variable::new("PDK_ROOT", VarType::optional(Path), "The directory the PDK was loaded from."),
        Variable::new("VDD_PIN", Str, "The power pin for the cells."),
        Variable::new("GND_PIN", Str, "The ground pin for the cells."),
        Variable::new("VDD_PIN_VOLTAGE", VarType::optional(Decimal), "The voltage of the power pin.").with_units("V"),
        Variable::new("TECH_LEFS", VarType::dict(Path), "Map of corner patterns to technology LEF files."),
        Variable::new("CELL_LEFS", VarType::list(Path), "A list of cell LEF files."),
        Variable::new("CELL_GDS", VarType::optional(VarType::list(Path)), "A list of cell GDS files."),
        Variable::new("FILL_CELL", str_list(), "Defines the fill cells used during fill insertion. Wildcards are supported."),
        Variable::new("DECAP_CELL", VarType::optional(str_list()), "Defines the decap cells used during fill insertion. Wildcards are supported."),
        Variable::new("WELLTAP_CELL", VarType::optional(Str), "Defines the cell used for tap insertion."),
        Variable::new("ENDCAP_CELL", VarType::optional(Str), "Defines the cell used for tap insertion at row ends."),
        Variable::new("PLACE_SITE", Str, "Defines the main site used by the cells."),
        Variable::new("DEFAULT_CORNER", Str, "The interconnect and PVT corner used when none is specified."),
        Variable::new("STA_CORNERS", str_list(), "A list of fully-qualified IPVT corners to use during static timing analysis."),
        Variable::new("FP_IO_HLAYER", Str, "The metal layer on which to place horizontally-aligned pins."),
        Variable::new("FP_IO_VLAYER", Str, "The metal layer on which to place vertically-aligned pins."),
        Variable::new("FP_TAPCELL_DIST", VarType::optional(Decimal), "The horizontal distance between two tapcell columns.").with_units(UM),
        Variable::new("RT_MIN_LAYER", Str, "The lowest metal layer to route on."),
        Variable::new("RT_MAX_LAYER", Str, "The highest metal layer to route on."),
        Variable::new("GRT_LAYER_ADJUSTMENTS", VarType::optional(VarType::list(Decimal)), "Layer-specific reductions in the routing capacity of the global routing graph, from 0 to 1."),
        Variable::new("DEFAULT_MAX_TRAN", VarType::optional(Decimal), "The maximum transition time allowed on any net.").with_units(NS),
        Variable::new("SYNTH_DRIVING_CELL", VarType::optional(Str), "The cell that drives the design's input ports."),
    ]
    .into_iter()
    .map(Variable::pdk)
    .collect()
}

fn design_variables() -> Vec<Variable> {
    use VarType::*;
    vec![
        Variable::new("DESIGN_DIR", VarType::optional(Path), "The directory of the design. Set automatically."),
        Variable::new("DESIGN_NAME", Str, "The name of the top level module of the design."),
        Variable::new("VERILOG_FILES", VarType::optional(VarType::list(Path)), "The paths of the design's Verilog files."),
        Variable::new("CLOCK_PORT", VarType::optional(Str), "The name of the design's clock port."),
        Variable::new("CLOCK_NET", VarType::optional(Str), "The name of the net driven by the clock port, if different."),
        Variable::new("CLOCK_PERIOD", Decimal, "The clock period for the design.").with_default(10).with_units(NS),
        Variable::new("MACROS", VarType::optional(VarType::dict(Any)), "A dictionary of macro records keyed by module name."),
    ]
}

fn antenna_variables() -> Vec<Variable> {
    use VarType::*;
    vec![
        Variable::new("GRT_REPAIR_ANTENNAS", Bool, "Specifies the insertion of diodes on nets with antenna violations after global routing.").with_default(true),
        Variable::new("RUN_HEURISTIC_DIODE_INSERTION", Bool, "Runs a heuristic diode insertion script.").with_default(false),
        Variable::new("DIODE_ON_PORTS", VarType::one_of(&["none", "in", "out", "both"]), "Always insert diodes on ports with the specified polarities.").with_default("none"),
    ]
}

fn io_layer_variables() -> Vec<Variable> {
    use VarType::*;
    vec![
        Variable::new("FP_IO_VEXTEND", Decimal, "Extends the vertical io pins outside of the die by the specified units.").with_default(0).with_units(UM),
        Variable::new("FP_IO_HEXTEND", Decimal, "Extends the horizontal io pins outside of the die by the specified units.").with_default(0).with_units(UM),
        Variable::new("FP_IO_VLENGTH", Decimal, "The length of the vertical IOs.").with_default(4).with_units(UM),
        Variable::new("FP_IO_HLENGTH", Decimal, "The length of the horizontal IOs.").with_default(4).with_units(UM),
        Variable::new("FP_IO_VTHICKNESS_MULT", Decimal, "A multiplier for vertical pin thickness. Base thickness is the pins layer minwidth.").with_default(2),
        Variable::new("FP_IO_HTHICKNESS_MULT", Decimal, "A multiplier for horizontal pin thickness. Base thickness is the pins layer minwidth.").with_default(2),
    ]
}

fn decimal(text: &str) -> Value {
    Value::number_from_str(text).unwrap_or_default()
}

fn pdn_variables() -> Vec<Variable> {
    use VarType::*;
    vec![
        Variable::new("FP_PDN_VOFFSET", Decimal, "The offset of the vertical power stripes on the metal layer 4 in the power distribution network.").with_default(decimal("16.32")).with_units(UM),
        Variable::new("FP_PDN_VPITCH", Decimal, "The pitch of the vertical power stripes on the metal layer 4 in the power distribution network.").with_default(decimal("153.6")).with_units(UM),
        Variable::new("FP_PDN_HOFFSET", Decimal, "The offset of the horizontal power stripes on the metal layer 5 in the power distribution network.").with_default(decimal("16.65")).with_units(UM),
        Variable::new("FP_PDN_HPITCH", Decimal, "The pitch of the horizontal power stripes on the metal layer 5 in the power distribution network.").with_default(decimal("153.18")).with_units(UM),
        Variable::new("FP_PDN_AUTO_ADJUST", Bool, "Decides whether or not the flow should attempt to re-adjust the power grid, in order for it to fit inside the core area of the design, if needed.").with_default(true),
        Variable::new("FP_PDN_SKIPTRIM", Bool, "Enables `-skip_trim` option during pdngen which skips the metal trim step, which attempts to remove metal stubs.").with_default(true),
        Variable::new("FP_PDN_CORE_RING", Bool, "Enables adding a core ring around the design.").with_default(false),
        Variable::new("FP_PDN_ENABLE_RAILS", Bool, "Enables the creation of rails in the power grid.").with_default(true),
        Variable::new("FP_PDN_CHECK_NODES", Bool, "Enables checking for unconnected nodes in the power grid.").with_default(true),
        Variable::new("FP_PDN_HORIZONTAL_HALO", Decimal, "Sets the horizontal halo around the macros during power grid insertion.").with_default(10).with_units(UM),
        Variable::new("FP_PDN_VERTICAL_HALO", Decimal, "Sets the vertical halo around the macros during power grid insertion.").with_default("ref::$FP_PDN_HORIZONTAL_HALO").with_units(UM),
        Variable::new("DESIGN_IS_CORE", Bool, "Controls the layers used in the power grid. Depending on whether the design is the core of a chip or a macro inside the core.").with_default(true),
    ]
}

fn routing_layer_variables() -> Vec<Variable> {
    use VarType::*;
    vec![
        Variable::new("RT_CLOCK_MIN_LAYER", VarType::optional(Str), "The name of lowest layer to be used in routing the clock net."),
        Variable::new("RT_CLOCK_MAX_LAYER", VarType::optional(Str), "The name of highest layer to be used in routing the clock net."),
        Variable::new("GRT_ADJUSTMENT", Decimal, "Reduction in the routing capacity of the edges between the cells in the global routing graph for all layers. Values range from 0 to 1.").with_default(decimal("0.3")),
        Variable::new("GRT_MACRO_EXTENSION", Int, "Sets the number of GCells added to the blockages boundaries from macros.").with_default(0),
    ]
}

fn placement_variables() -> Vec<Variable> {
    use VarType::*;
    let str_list = || VarType::optional(VarType::list(Str));
    vec![
        Variable::new("PL_OPTIMIZE_MIRRORING", Bool, "Specifies whether or not to run an optimize_mirroring pass whenever detailed placement happens.").with_default(true),
        Variable::new("PL_MAX_DISPLACEMENT_X", Decimal, "Specifies how far an instance can be moved along the X-axis when finding a site where it can be placed during detailed placement.").with_default(500).with_units(UM),
        Variable::new("PL_MAX_DISPLACEMENT_Y", Decimal, "Specifies how far an instance can be moved along the Y-axis when finding a site where it can be placed during detailed placement.").with_default(100).with_units(UM),
        Variable::new("RSZ_DONT_TOUCH_RX", Str, "A single regular expression designating nets or instances as \"don't touch\" by resizer optimizations.").with_default("$^").with_deprecated_names(&["UNBUFFER_NETS"]),
        Variable::new("RSZ_DONT_TOUCH_LIST", str_list(), "A list of nets and instances as \"don't touch\" by resizer optimizations."),
        Variable::new("RSZ_DONT_USE_CELLS", str_list(), "An optional list of cells to not use during resizer optimizations.").with_deprecated_names(&["DONT_USE_CELLS"]),
        Variable::new("RSZ_CORNERS", str_list(), "A list of fully-qualified IPVT corners to use during resizer optimizations. If unspecified, the value for `STA_CORNERS` from the PDK will be used."),
    ]
}

fn constraint_variables() -> Vec<Variable> {
    use VarType::*;
    vec![
        Variable::new("MAX_FANOUT_CONSTRAINT", Int, "The max load that the output ports can drive to be used as a constraint on Synthesis and CTS.").with_default(10).with_units("cells").with_deprecated_names(&["SYNTH_MAX_FANOUT"]),
        Variable::new("MAX_TRANSITION_CONSTRAINT", VarType::optional(Decimal), "The max transition time (slew) from high to low or low to high on cell inputs to be used as a constraint on Synthesis and CTS. If not provided, the PDK's `DEFAULT_MAX_TRAN` applies.").with_units(NS).with_deprecated_names(&["SYNTH_MAX_TRAN"]),
        Variable::new("CLOCK_UNCERTAINTY_CONSTRAINT", Decimal, "Specifies a value for the clock uncertainty/jitter for timing analysis.").with_default(decimal("0.25")).with_units(NS).with_deprecated_names(&["SYNTH_CLOCK_UNCERTAINTY"]),
        Variable::new("CLOCK_TRANSITION_CONSTRAINT", Decimal, "Specifies a value for the clock transition/slew for timing analysis.").with_default(decimal("0.15")).with_units(NS).with_deprecated_names(&["SYNTH_CLOCK_TRANSITION"]),
        Variable::new("TIME_DERATING_CONSTRAINT", Decimal, "Specifies a derating factor to multiply the path delays with. It specifies the upper and lower ranges of timing.").with_default(5).with_units("%").with_deprecated_names(&["SYNTH_TIMING_DERATE"]),
        Variable::new("IO_DELAY_CONSTRAINT", Decimal, "Specifies the percentage of the clock period used in the input/output delays.").with_default(20).with_units("%").with_deprecated_names(&["IO_PCT"]),
    ]
}

/// Flow variables shared by every flow, in compile order.
pub fn flow_common_variables() -> Vec<Variable> {
    [
        design_variables(),
        antenna_variables(),
        io_layer_variables(),
        pdn_variables(),
        routing_layer_variables(),
        placement_variables(),
        constraint_variables(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Keys PDK files may still set that have no effect anymore.
pub fn technology_removed() -> RemovedTable {
    RemovedTable::new()
        .with("GLB_RT_L1_ADJUSTMENT", "Use GRT_LAYER_ADJUSTMENTS instead.")
        .with("GLB_RT_L2_ADJUSTMENT", "Use GRT_LAYER_ADJUSTMENTS instead.")
        .with("LIB_SYNTH_COMPLEMENT", "Synthesis now uses the library set by the PDK's LIB.")
}

/// Keys designs may still set that have no effect anymore.
pub fn removed() -> RemovedTable {
    RemovedTable::new()
        .with("GLB_RT_MINLAYER", "Use RT_MIN_LAYER instead.")
        .with("GLB_RT_MAXLAYER", "Use RT_MAX_LAYER instead.")
        .with("GLB_RT_ADJUSTMENT", "Use GRT_ADJUSTMENT instead.")
        .with("RUN_ROUTING_DETAILED", "Detailed routing can no longer be disabled.")
        .with("FP_PDN_LOWER_LAYER", "The power grid layers are now chosen by the PDK.")
        .with("FP_PDN_UPPER_LAYER", "The power grid layers are now chosen by the PDK.")
}

fn refs(variables: Vec<Variable>) -> Vec<VariableRef> {
    variables.into_iter().map(Variable::into_ref).collect()
}

/// The built-in catalog.
pub fn catalog() -> Catalog {
    Catalog::new(refs(technology_variables()))
        .with_technology_removed(technology_removed())
        .with_flow_common(refs(flow_common_variables()))
        .with_removed(removed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for variable in technology_variables().iter().chain(flow_common_variables().iter()) {
            assert!(seen.insert(variable.name.clone()), "duplicate {}", variable.name);
        }
    }

    #[test]
    fn technology_variables_are_marked() {
        assert!(technology_variables().iter().all(|v| v.pdk));
        assert!(flow_common_variables().iter().all(|v| !v.pdk));
    }

    #[test]
    fn removed_keys_are_not_variables() {
        let names: HashSet<_> = technology_variables()
            .into_iter()
            .chain(flow_common_variables())
            .map(|v| v.name)
            .collect();
        for (key, _) in removed().iter().chain(technology_removed().iter()) {
            assert!(!names.contains(key), "{key} is both removed and defined");
        }
    }

    #[test]
    fn reference_defaults_point_backwards() {
        let variables = flow_common_variables();
        for (i, variable) in variables.iter().enumerate() {
            let Some(Value::String(default)) = &variable.default else {
                continue;
            };
            if let Some(target) = default.strip_prefix(crate::variable::REF_DEFAULT_PREFIX) {
                assert!(
                    variables[..i].iter().any(|v| v.name == target),
                    "{} references {target}, which is not defined earlier",
                    variable.name
                );
            }
        }
    }
}
