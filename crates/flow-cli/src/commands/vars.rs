//! The vars command

use flow_vars::{flow_common_variables, render_reference, technology_variables};

/// Print the variable reference tables.
pub fn run_vars(pdk_only: bool) {
    println!("## PDK Variables\n");
    print!("{}", render_reference(&technology_variables()));
    if !pdk_only {
        println!("\n## Flow Variables\n");
        print!("{}", render_reference(&flow_common_variables()));
    }
}
