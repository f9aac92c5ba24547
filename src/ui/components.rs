/// Reusable UI components for the history viewer

use crate::filter::HistoryFilter;
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
    pub active: HistoryFilter,
    pub on_select: Callback<HistoryFilter>,
}

/// One button per filter; the active one is highlighted
#[function_component(FilterBar)]
pub fn filter_bar(props: &FilterBarProps) -> Html {
    html! {
        <div class="filter-bar">
            {for HistoryFilter::ALL.into_iter().map(|filter| {
                let variant = if filter == props.active {
                    ButtonVariant::Primary
                } else {
                    ButtonVariant::Secondary
                };
                html! {
                    <Button
                        onclick={props.on_select.reform(move |_| filter)}
                        variant={variant}
                    >
                        {filter.label()}
                    </Button>
                }
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct HistoryListProps {
    /// Pre-rendered, already escaped entry markup
    pub markup: AttrValue,
}

#[function_component(HistoryList)]
pub fn history_list(props: &HistoryListProps) -> Html {
    html! {
        <div id="history" class="history-list">
            {Html::from_html_unchecked(props.markup.clone())}
        </div>
    }
}
