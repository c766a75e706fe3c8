use yew::prelude::*;

use common::view::PlanView;

use super::helpers::format_quantity;

/// Horizontal bars of planned volume per forest unit, scaled to the largest.
pub fn forest_chart(view: &PlanView) -> Html {
    if view.forest_volumes.is_empty() {
        return html! {};
    }
    let peak = view.peak_forest_volume();
    html! {
        <div class="forest-chart">
            <h4>{ "Volume by forest unit (m³)" }</h4>
            { for view.forest_volumes.iter().map(|entry| {
                let width = if peak > 0.0 { entry.volume / peak * 100.0 } else { 0.0 };
                html! {
                    <div class="chart-row">
                        <span class="chart-label">{ entry.forest.clone() }</span>
                        <div class="chart-track">
                            <div class="chart-bar" style={format!("width: {:.1}%;", width)} />
                        </div>
                        <span class="chart-value">{ format_quantity(entry.volume) }</span>
                    </div>
                }
            }) }
        </div>
    }
}
