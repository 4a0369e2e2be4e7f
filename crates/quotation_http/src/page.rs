//! Index page rendering.
//!
//! The page is a single static template; dynamic values are substituted
//! after HTML escaping. Editing, saving and loading happen client-side
//! through the JSON endpoints.

use crate::escape::{html_escape, percent_encode};
use quotation_core::{QuotationDraft, QuotationSummary};

const INDEX_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="zh-Hant">
<head>
<meta charset="utf-8">
<title>報價單管理</title>
<style>
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; margin-bottom: 1.5em; }
th, td { border: 1px solid #ccc; padding: 4px 8px; }
input, textarea { width: 100%; box-sizing: border-box; }
#status { margin-top: 1em; font-weight: bold; }
</style>
</head>
<body>
<h1>報價單</h1>
<form id="quotation-form">
<table>
<tr><th>報價單編號</th><td><input name="quotation_number" value="{{QUOTATION_NUMBER}}"></td></tr>
<tr><th>日期</th><td><input name="date" value="{{CURRENT_DATE}}"></td></tr>
<tr><th>客戶名稱</th><td><input name="customer"></td></tr>
<tr><th>聯絡人</th><td><input name="contact_person"></td></tr>
<tr><th>地址</th><td><input name="address"></td></tr>
<tr><th>備註說明</th><td><textarea name="notes"></textarea></td></tr>
</table>
<table id="items">
<thead><tr><th>項目描述</th><th>數量</th><th>單價</th><th>金額</th><th>備註</th><th></th></tr></thead>
<tbody></tbody>
</table>
<button type="button" id="add-item">新增項目</button>
<p>總金額: <span id="grand-total">0</span></p>
<button type="submit">儲存報價單</button>
</form>
<div id="status"></div>
<h2>歷史報價單</h2>
<table>
<thead><tr><th>報價單編號</th><th>日期</th><th>客戶名稱</th><th>總金額</th><th></th></tr></thead>
<tbody>
{{QUOTATION_ROWS}}</tbody>
</table>
<script>
const form = document.getElementById("quotation-form");
const itemRows = document.querySelector("#items tbody");
const statusBox = document.getElementById("status");

function addItem(item) {
  item = item || {};
  const row = document.createElement("tr");
  for (const key of ["description", "quantity", "unit_price", "amount", "notes"]) {
    const cell = document.createElement("td");
    const input = document.createElement("input");
    input.dataset.key = key;
    input.value = item[key] ?? "";
    if (key === "amount") input.readOnly = true;
    input.addEventListener("input", recalc);
    cell.appendChild(input);
    row.appendChild(cell);
  }
  const remove = document.createElement("button");
  remove.type = "button";
  remove.textContent = "刪除";
  remove.addEventListener("click", () => { row.remove(); recalc(); });
  row.appendChild(document.createElement("td")).appendChild(remove);
  itemRows.appendChild(row);
  recalc();
}

function collectItems() {
  return Array.from(itemRows.rows).map((row) => {
    const item = {};
    row.querySelectorAll("input").forEach((input) => {
      const key = input.dataset.key;
      item[key] = ["quantity", "unit_price", "amount"].includes(key)
        ? Number(input.value) || 0
        : input.value;
    });
    return item;
  });
}

function recalc() {
  let total = 0;
  for (const row of itemRows.rows) {
    const get = (key) => row.querySelector(`input[data-key="${key}"]`);
    const amount = (Number(get("quantity").value) || 0) * (Number(get("unit_price").value) || 0);
    get("amount").value = amount;
    total += amount;
  }
  document.getElementById("grand-total").textContent = total;
}

form.addEventListener("submit", async (event) => {
  event.preventDefault();
  const payload = Object.fromEntries(new FormData(form));
  payload.items = collectItems();
  payload.grand_total = Number(document.getElementById("grand-total").textContent) || 0;
  const response = await fetch("/save", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(payload),
  });
  const result = await response.json();
  statusBox.textContent = result.message || "";
});

async function loadQuotation(id) {
  const response = await fetch("/load/" + encodeURIComponent(id));
  const result = await response.json();
  if (!result.success) {
    statusBox.textContent = result.message || "";
    return;
  }
  for (const [key, value] of Object.entries(result.data)) {
    if (form.elements[key]) form.elements[key].value = value ?? "";
  }
  itemRows.innerHTML = "";
  (result.data.items || []).forEach(addItem);
}

async function deleteQuotation(id) {
  const response = await fetch("/delete/" + encodeURIComponent(id));
  const result = await response.json();
  statusBox.textContent = result.message || "";
  if (result.success) window.location.reload();
}

document.getElementById("add-item").addEventListener("click", () => addItem());
document.querySelectorAll("[data-load]").forEach((el) =>
  el.addEventListener("click", () => loadQuotation(el.dataset.load)));
document.querySelectorAll("[data-delete]").forEach((el) =>
  el.addEventListener("click", () => deleteQuotation(el.dataset.delete)));
addItem();
</script>
</body>
</html>
"##;

/// Renders the index page for a new draft and the stored summaries.
pub fn render_index(draft: &QuotationDraft, summaries: &[QuotationSummary]) -> String {
    INDEX_TEMPLATE
        .replace("{{QUOTATION_NUMBER}}", &html_escape(&draft.quotation_number))
        .replace("{{CURRENT_DATE}}", &html_escape(&draft.date))
        .replace("{{QUOTATION_ROWS}}", &summary_rows(summaries))
}

fn summary_rows(summaries: &[QuotationSummary]) -> String {
    let mut rows = String::new();
    for summary in summaries {
        let id = html_escape(summary.id.as_str());
        let path = percent_encode(summary.id.as_str());
        rows.push_str(&format!(
            "<tr><td>{id}</td><td>{date}</td><td>{customer}</td><td>{total}</td>\
<td><button type=\"button\" data-load=\"{id}\">載入</button> \
<a href=\"/export/txt/{path}\">文字檔</a> \
<a href=\"/export/excel/{path}\">Excel</a> \
<button type=\"button\" data-delete=\"{id}\">刪除</button></td></tr>\n",
            date = html_escape(&summary.date),
            customer = html_escape(&summary.customer),
            total = html_escape(&summary.total.to_string()),
        ));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::render_index;
    use quotation_core::{Figure, QuotationDraft, QuotationId, QuotationSummary};

    fn draft() -> QuotationDraft {
        QuotationDraft {
            quotation_number: "QTN-20240101-120000".to_string(),
            date: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn prefills_draft_number_and_date() {
        let html = render_index(&draft(), &[]);
        assert!(html.contains(r#"value="QTN-20240101-120000""#));
        assert!(html.contains(r#"value="2024-01-01""#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn lists_summaries_with_escaped_text_and_encoded_links() {
        let summary = QuotationSummary {
            id: QuotationId::parse("QTN 報價").unwrap(),
            date: "2024-02-02".to_string(),
            customer: "<Acme & Co>".to_string(),
            total: Figure::from(42),
        };
        let html = render_index(&draft(), &[summary]);

        assert!(html.contains("<td>&lt;Acme &amp; Co&gt;</td><td>42</td>"));
        assert!(html.contains(r#"href="/export/txt/QTN%20%E5%A0%B1%E5%83%B9""#));
        assert!(html.contains(r#"data-load="QTN 報價""#));
    }
}
