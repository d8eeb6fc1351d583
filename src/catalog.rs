//! ツアーカタログ（(role, context) から step 列への解決テーブル)
//!
//! 解決順は context 固有エントリ、role デフォルト、の二段構え。どちらも
//! 無ければ解決失敗で、呼び出し側が NoStepsForContext にする。組み込み
//! テーブルのほか、JSON から読み込んだカタログで差し替えられる。

use crate::domain::step::{StepSpec, TourDefinition};
use crate::domain::{Role, TourContext, TourId};
use crate::error::Error;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

/// (role, context) の組に対する標準のツアー識別子
pub fn tour_id_for(role: Role, context: TourContext) -> TourId {
    TourId::new(format!("welcome-{}-{}", role.as_str(), context.as_str()))
}

/// step 列の解決テーブル
#[derive(Debug, Clone, Default)]
pub struct TourCatalog {
    tours: HashMap<(Role, TourContext), TourDefinition>,
    defaults: HashMap<Role, Vec<StepSpec>>,
}

impl TourCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// context 固有のツアーを登録する
    pub fn insert_tour(&mut self, role: Role, context: TourContext, definition: TourDefinition) {
        self.tours.insert((role, context), definition);
    }

    /// role デフォルトの step 列を登録する
    pub fn insert_default(&mut self, role: Role, steps: Vec<StepSpec>) {
        self.defaults.insert(role, steps);
    }

    /// (role, context) からツアー定義を解決する
    ///
    /// context 固有エントリが無い場合は role デフォルトに落ち、識別子は
    /// `tour_id_for` で合成する。どちらも無ければ None。
    pub fn resolve(&self, role: Role, context: TourContext) -> Option<TourDefinition> {
        if let Some(def) = self.tours.get(&(role, context)) {
            return Some(def.clone());
        }
        self.defaults.get(&role).map(|steps| TourDefinition {
            id: tour_id_for(role, context),
            steps: steps.clone(),
        })
    }

    /// JSON 文字列からカタログを読み込む
    ///
    /// エントリの id は省略可で、省略時は resolve 時と同じ規則で合成する。
    /// 未知の role / context、step 列が空のエントリはエラー。
    pub fn parse_json(json: &str) -> Result<Self, Error> {
        let raw: CatalogRaw = serde_json::from_str(json).map_err(|e| Error::json(e.to_string()))?;
        let mut catalog = TourCatalog::empty();
        for tour in raw.tours {
            let role = Role::from_str(&tour.role)?;
            let context = TourContext::from_str(&tour.context)?;
            if tour.steps.is_empty() {
                return Err(Error::invalid_argument(format!(
                    "tour {}/{} has no steps",
                    tour.role, tour.context
                )));
            }
            let id = match tour.id {
                Some(id) => TourId::new(id),
                None => tour_id_for(role, context),
            };
            let steps = tour.steps.into_iter().map(StepRaw::into_spec).collect();
            catalog.insert_tour(role, context, TourDefinition { id, steps });
        }
        for default in raw.defaults {
            let role = Role::from_str(&default.role)?;
            if default.steps.is_empty() {
                return Err(Error::invalid_argument(format!(
                    "defaults for {} have no steps",
                    default.role
                )));
            }
            let steps = default.steps.into_iter().map(StepRaw::into_spec).collect();
            catalog.insert_default(role, steps);
        }
        Ok(catalog)
    }

    /// 組み込みカタログ
    ///
    /// 文言は本番 UI の表示文字列そのもの（スペイン語）。コメントや
    /// 識別子は英語のまま運ぶ。
    pub fn builtin() -> Self {
        let mut c = TourCatalog::empty();

        c.insert_default(
            Role::Producer,
            vec![
                step("Bienvenido", "Desde aquí administras tus productos y ventas.", "#main-nav"),
                step("Tus productos", "Publica y actualiza tu catálogo de productos.", "#nav-products"),
                step("Ayuda", "Encuentra guías y soporte cuando lo necesites.", "#help-menu"),
            ],
        );
        c.insert_default(
            Role::Buyer,
            vec![
                step("Bienvenido", "Compra directo de productores agrícolas.", "#main-nav"),
                step("Busca productos", "Filtra por categoría, provincia y precio.", "#search-bar"),
                step("Tu cuenta", "Revisa tus pedidos y datos desde tu perfil.", "#account-menu"),
            ],
        );
        c.insert_default(
            Role::Admin,
            vec![
                step("Panel de administración", "Gestión de usuarios, productos y reportes.", "#admin-nav"),
                step("Moderación", "Revisa publicaciones reportadas y cuentas nuevas.", "#moderation-queue"),
                step("Reportes", "Exporta métricas de actividad del mercado.", "#reports-menu"),
            ],
        );

        c.insert_tour(
            Role::Producer,
            TourContext::Dashboard,
            def(Role::Producer, TourContext::Dashboard, vec![
                step("Tu panel de productor", "Aquí ves un resumen de ventas, pedidos y productos.", "#dashboard-summary"),
                step("Publica un producto", "Crea tu primera publicación con fotos y precio.", "#create-product-button"),
                step("Pedidos recientes", "Revisa y gestiona los pedidos de tus compradores.", "#recent-orders"),
            ]),
        );
        c.insert_tour(
            Role::Producer,
            TourContext::ProductCreate,
            def(Role::Producer, TourContext::ProductCreate, vec![
                step("Datos del producto", "Escribe un nombre claro y una descripción completa.", "#product-name"),
                step("Categoría y unidad", "Elige la categoría y la unidad de venta (kg, caja, saco).", "#product-category"),
                step("Precio y stock", "Define el precio por unidad y la cantidad disponible.", "#product-price"),
                step("Fotos", "Sube fotos nítidas. Los productos con fotos venden más.", "#product-photos"),
            ]),
        );
        c.insert_tour(
            Role::Producer,
            TourContext::ProductEdit,
            def(Role::Producer, TourContext::ProductEdit, vec![
                step("Edita tu producto", "Actualiza datos sin perder el historial de ventas.", "#product-form"),
                step("Disponibilidad", "Pausa la publicación cuando no tengas stock.", "#product-status"),
                step("Guardar cambios", "Los cambios se publican de inmediato al guardar.", "#save-button"),
            ]),
        );
        c.insert_tour(
            Role::Producer,
            TourContext::Orders,
            def(Role::Producer, TourContext::Orders, vec![
                step("Pedidos recibidos", "Aquí llegan los pedidos de tus compradores.", "#orders-table"),
                step("Estados del pedido", "Confirma, prepara y marca como entregado cada pedido.", "#order-status"),
                step("Contacto", "Coordina la entrega directamente con el comprador.", "#order-contact"),
            ]),
        );

        c.insert_tour(
            Role::Buyer,
            TourContext::Marketplace,
            def(Role::Buyer, TourContext::Marketplace, vec![
                step("Explora el mercado", "Productos frescos publicados por productores locales.", "#product-grid"),
                step("Filtros", "Ajusta categoría, provincia y rango de precio.", "#filters-panel"),
                step("Ficha del producto", "Abre un producto para ver fotos, precio y vendedor.", "#product-card"),
                step("Agrega al carrito", "Junta varios productos y paga en un solo pedido.", "#add-to-cart"),
            ]),
        );
        c.insert_tour(
            Role::Buyer,
            TourContext::Cart,
            def(Role::Buyer, TourContext::Cart, vec![
                step("Tu carrito", "Revisa cantidades y subtotales antes de pagar.", "#cart-items"),
                step("Datos de pago", "Usa una tarjeta válida; verificamos número y vencimiento.", "#payment-form"),
                step("Confirmar pedido", "Al confirmar, el productor recibe tu pedido.", "#checkout-button"),
            ]),
        );
        c.insert_tour(
            Role::Buyer,
            TourContext::Orders,
            def(Role::Buyer, TourContext::Orders, vec![
                step("Tus pedidos", "Sigue el estado de cada compra.", "#orders-list"),
                step("Detalle", "Abre un pedido para ver productos y totales.", "#order-detail"),
                step("Historial", "Vuelve a pedir fácilmente desde compras anteriores.", "#reorder-button"),
            ]),
        );

        c.insert_tour(
            Role::Admin,
            TourContext::Dashboard,
            def(Role::Admin, TourContext::Dashboard, vec![
                step("Resumen general", "Actividad del mercado: usuarios, publicaciones y ventas.", "#admin-summary"),
                step("Usuarios", "Administra cuentas de productores y compradores.", "#admin-users"),
                step("Alertas", "Atiende reportes y verificaciones pendientes.", "#admin-alerts"),
            ]),
        );

        c
    }
}

fn step(title: &str, body: &str, target_selector: &str) -> StepSpec {
    StepSpec::new(title, body, target_selector)
}

fn def(role: Role, context: TourContext, steps: Vec<StepSpec>) -> TourDefinition {
    TourDefinition {
        id: tour_id_for(role, context),
        steps,
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRaw {
    #[serde(default)]
    tours: Vec<TourRaw>,
    #[serde(default)]
    defaults: Vec<DefaultRaw>,
}

#[derive(Debug, Deserialize)]
struct TourRaw {
    role: String,
    context: String,
    id: Option<String>,
    steps: Vec<StepRaw>,
}

#[derive(Debug, Deserialize)]
struct DefaultRaw {
    role: String,
    steps: Vec<StepRaw>,
}

#[derive(Debug, Deserialize)]
struct StepRaw {
    title: String,
    body: String,
    #[serde(default)]
    target_selector: String,
}

impl StepRaw {
    fn into_spec(self) -> StepSpec {
        StepSpec {
            title: self.title,
            body: self.body,
            target_selector: self.target_selector,
        }
    }
}
