// ==========================================
// ONE Tracker 质检分析引擎 - 行校验器
// ==========================================
// 必填: OrderNumber / FinishedDate / SKU / Quantity / Inspector
//       （Scrap 缺失时 FinalQty 必填）
// 缺省: Repairs / QC_Fail / Sewing_Fail 空白视为 0
// 派生: Scrap 缺失 → max(Quantity - FinalQty, 0)
//       FinalQty 一律重算为 Quantity - Scrap
//       ParentSKU 由 SKU 解析器生成
// 红线: 必填字段缺失的行剔除并计入数据质量，不得以 0 代替
// ==========================================

use crate::config::SkuCatalog;
use crate::domain::inspection::{InspectionRow, RawInspectionRecord, RejectionKind, RowRejection};
use crate::engine::sku_resolver::SkuResolver;
use crate::importer::inspection_importer_trait::RowValidator;

pub struct InspectionRowValidator {
    catalog: SkuCatalog,
}

impl InspectionRowValidator {
    pub fn new(catalog: SkuCatalog) -> Self {
        Self { catalog }
    }
}

fn reject(raw: &RawInspectionRecord, kind: RejectionKind, field: &str, detail: String) -> RowRejection {
    RowRejection {
        row_number: raw.row_number,
        sheet: raw.sheet.clone(),
        kind,
        field: field.to_string(),
        detail,
    }
}

fn required<T: Clone>(raw: &RawInspectionRecord, value: &Option<T>, field: &str) -> Result<T, RowRejection> {
    value.clone().ok_or_else(|| {
        reject(
            raw,
            RejectionKind::MissingRequiredField,
            field,
            format!("{} 缺失", field),
        )
    })
}

/// 非负件数 → u32
fn count(raw: &RawInspectionRecord, value: i64, field: &str) -> Result<u32, RowRejection> {
    u32::try_from(value).map_err(|_| {
        reject(
            raw,
            RejectionKind::InvalidValue,
            field,
            format!("件数无效: {}", value),
        )
    })
}

impl RowValidator for InspectionRowValidator {
    fn validate(&self, raw: RawInspectionRecord) -> Result<InspectionRow, RowRejection> {
        let order_number = required(&raw, &raw.order_number, "order_number")?;
        let finished_date = required(&raw, &raw.finished_date, "finished_date")?;
        let sku = required(&raw, &raw.sku, "sku")?;
        let quantity = count(&raw, required(&raw, &raw.quantity, "quantity")?, "quantity")?;
        let inspector = required(&raw, &raw.inspector, "inspector")?;

        let repairs = count(&raw, raw.repairs.unwrap_or(0), "repairs")?;
        let qc_fail = count(&raw, raw.qc_fail.unwrap_or(0), "qc_fail")?;
        let sewing_fail = count(&raw, raw.sewing_fail.unwrap_or(0), "sewing_fail")?;

        let scrap = match raw.scrap {
            Some(scrap) => count(&raw, scrap, "scrap")?,
            None => {
                let final_qty = count(&raw, required(&raw, &raw.final_qty, "final_qty")?, "final_qty")?;
                quantity.saturating_sub(final_qty)
            }
        };

        if scrap > quantity {
            return Err(reject(
                &raw,
                RejectionKind::InconsistentQuantities,
                "scrap",
                format!("报废 {} 超过检验数量 {}", scrap, quantity),
            ));
        }
        if repairs > quantity {
            return Err(reject(
                &raw,
                RejectionKind::InconsistentQuantities,
                "repairs",
                format!("返修 {} 超过检验数量 {}", repairs, quantity),
            ));
        }

        let parent_sku = SkuResolver::new(&self.catalog).resolve(&sku);

        Ok(InspectionRow {
            order_number,
            lot_number: raw.lot_number.unwrap_or_default(),
            due_date: raw.due_date,
            finished_date,
            sku,
            parent_sku,
            quantity,
            repairs,
            scrap,
            final_qty: quantity - scrap,
            inspector,
            red_flag: raw.red_flag,
            ncr: raw.ncr,
            qc_fail,
            sewing_fail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw() -> RawInspectionRecord {
        RawInspectionRecord {
            order_number: Some("WO-1".to_string()),
            finished_date: NaiveDate::from_ymd_opt(2026, 1, 15),
            sku: Some("PC-F20-BK-LG".to_string()),
            quantity: Some(20),
            scrap: Some(2),
            inspector: Some("ANA".to_string()),
            row_number: 5,
            ..Default::default()
        }
    }

    fn validator() -> InspectionRowValidator {
        InspectionRowValidator::new(SkuCatalog::default())
    }

    #[test]
    fn test_valid_row_derives_fields() {
        let row = validator().validate(raw()).unwrap();
        assert_eq!(row.parent_sku, "PC-F20-LG");
        assert_eq!(row.final_qty, 18);
        assert_eq!(row.repairs, 0);
        assert_eq!(row.qc_fail, 0);
    }

    #[test]
    fn test_scrap_derived_from_final_qty() {
        let mut r = raw();
        r.scrap = None;
        r.final_qty = Some(17);
        let row = validator().validate(r).unwrap();
        assert_eq!(row.scrap, 3);
        assert_eq!(row.final_qty, 17);

        // FinalQty 大于 Quantity 时报废取 0
        let mut r = raw();
        r.scrap = None;
        r.final_qty = Some(25);
        assert_eq!(validator().validate(r).unwrap().scrap, 0);
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let mut r = raw();
        r.finished_date = None;
        let rejection = validator().validate(r).unwrap_err();
        assert_eq!(rejection.kind, RejectionKind::MissingRequiredField);
        assert_eq!(rejection.field, "finished_date");
        assert_eq!(rejection.row_number, 5);

        let mut r = raw();
        r.scrap = None;
        let rejection = validator().validate(r).unwrap_err();
        assert_eq!(rejection.field, "final_qty");
    }

    #[test]
    fn test_inconsistent_and_negative_values() {
        let mut r = raw();
        r.scrap = Some(30);
        let rejection = validator().validate(r).unwrap_err();
        assert_eq!(rejection.kind, RejectionKind::InconsistentQuantities);

        let mut r = raw();
        r.repairs = Some(-1);
        let rejection = validator().validate(r).unwrap_err();
        assert_eq!(rejection.kind, RejectionKind::InvalidValue);
    }
}
